//! Row iteration with group tracking, and the content tree built from it.

use log::debug;
use tally_types::{GroupInstanceId, Value};

use crate::definition::GroupDefinition;
use crate::layout::{BandKind, BandSizes, ContentTree, LevelPolicy};
use crate::source::{DataSource, SourceError};

/// One runtime occurrence of a group level.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupInstance {
    pub id: GroupInstanceId,
    pub level: usize,
    /// Field values of this level and every outer level.
    pub key: Vec<Value>,
    pub start_row: usize,
    pub end_row: usize,
}

/// What changed when the cursor moved onto a row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTransition {
    pub row: usize,
    /// Levels whose instance starts at this row, outer to inner.
    pub opened: Vec<usize>,
    /// Levels whose instance ends at this row, inner to outer.
    pub closed: Vec<usize>,
}

/// Walks the rows of a data source in order and reports group openings and
/// closings. The cursor never touches accumulators.
pub struct RowCursor<'a, S: DataSource + ?Sized> {
    source: &'a S,
    groups: &'a [GroupDefinition],
    next_row: usize,
    current: Option<Vec<Value>>,
    lookahead: Option<Vec<Value>>,
}

impl<'a, S: DataSource + ?Sized> RowCursor<'a, S> {
    pub fn new(source: &'a S, groups: &'a [GroupDefinition]) -> Self {
        Self {
            source,
            groups,
            next_row: 0,
            current: None,
            lookahead: None,
        }
    }

    /// Rewinds to before the first row.
    pub fn reset(&mut self) {
        self.next_row = 0;
        self.current = None;
        self.lookahead = None;
    }

    pub fn advance(&mut self) -> Result<Option<RowTransition>, SourceError> {
        let row = self.next_row;
        if row >= self.source.row_count() {
            return Ok(None);
        }

        let here = match self.lookahead.take() {
            Some(values) => values,
            None => self.group_values(row)?,
        };
        let next = if row + 1 < self.source.row_count() {
            Some(self.group_values(row + 1)?)
        } else {
            None
        };

        let levels = self.groups.len();
        let first_opened = match &self.current {
            Some(previous) => self.first_changed_level(previous, &here),
            None => 0,
        };
        let first_closed = match &next {
            Some(next) => self.first_changed_level(&here, next),
            None => 0,
        };

        self.current = Some(here);
        self.lookahead = next;
        self.next_row = row + 1;

        Ok(Some(RowTransition {
            row,
            opened: (first_opened..levels).collect(),
            closed: (first_closed..levels).rev().collect(),
        }))
    }

    /// The identity key of `level` at the current row.
    pub fn key(&self, level: usize) -> Vec<Value> {
        let width: usize = self.groups[..=level].iter().map(|g| g.fields.len()).sum();
        self.current
            .as_ref()
            .map(|values| values[..width].to_vec())
            .unwrap_or_default()
    }

    fn group_values(&self, row: usize) -> Result<Vec<Value>, SourceError> {
        self.groups
            .iter()
            .flat_map(|g| g.fields.iter())
            .map(|field| self.source.value_at(row, field))
            .collect()
    }

    /// The outermost level whose own fields differ between two rows, or the
    /// level count when none do.
    fn first_changed_level(&self, a: &[Value], b: &[Value]) -> usize {
        let mut offset = 0;
        for (level, group) in self.groups.iter().enumerate() {
            let width = group.fields.len();
            if a[offset..offset + width] != b[offset..offset + width] {
                return level;
            }
            offset += width;
        }
        self.groups.len()
    }
}

/// Flattens the rows into bands: headers for opened levels, one item band,
/// then footers for closed levels.
///
/// A header for level L updates only that level's current instance, so the
/// band records the previous instance of every deeper level.
pub fn build_content<S: DataSource + ?Sized>(
    source: &S,
    groups: &[GroupDefinition],
    sizes: &BandSizes,
) -> Result<(ContentTree, Vec<GroupInstance>), SourceError> {
    let policies = groups
        .iter()
        .map(|g| LevelPolicy {
            repeat_header: g.repeat_header,
            repeat_footer: g.repeat_footer,
        })
        .collect();
    let mut tree = ContentTree::new(policies);
    let mut instances: Vec<GroupInstance> = Vec::new();
    let mut current: Vec<Option<GroupInstanceId>> = vec![None; groups.len()];

    let mut cursor = RowCursor::new(source, groups);
    while let Some(transition) = cursor.advance()? {
        let row = transition.row;
        for &level in &transition.opened {
            let id = GroupInstanceId(instances.len() as u32);
            current[level] = Some(id);
            instances.push(GroupInstance {
                id,
                level,
                key: cursor.key(level),
                start_row: row,
                end_row: row,
            });
            let header = tree.push_band(
                BandKind::GroupHeader { level },
                row,
                sizes.header_height(level),
                current.clone(),
            );
            tree.open_span(id, level, header, row);
        }

        tree.push_band(BandKind::Item, row, sizes.item, current.clone());

        for &level in &transition.closed {
            let footer = tree.push_band(
                BandKind::GroupFooter { level },
                row,
                sizes.footer_height(level),
                current.clone(),
            );
            if let Some(id) = current[level] {
                tree.close_span(id, footer, row);
                instances[id.0 as usize].end_row = row;
            }
        }
    }

    debug!(
        "Built content tree: {} rows, {} bands, {} group instances.",
        source.row_count(),
        tree.len(),
        instances.len()
    );
    Ok((tree, instances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TableDataSource;

    fn source() -> TableDataSource {
        let mut table = TableDataSource::new(["A", "B"]);
        for (a, b) in [("x", "1"), ("x", "1"), ("x", "2"), ("y", "2")] {
            table.add_row([Value::from(a), Value::from(b)]).unwrap();
        }
        table
    }

    fn groups() -> Vec<GroupDefinition> {
        vec![
            GroupDefinition::new("A", ["A"]),
            GroupDefinition::new("B", ["B"]),
        ]
    }

    #[test]
    fn transitions_open_and_close_levels() {
        let source = source();
        let groups = groups();
        let mut cursor = RowCursor::new(&source, &groups);

        let mut seen = Vec::new();
        while let Some(t) = cursor.advance().unwrap() {
            seen.push((t.opened, t.closed));
        }
        assert_eq!(
            seen,
            vec![
                (vec![0, 1], vec![]),
                (vec![], vec![1]),
                (vec![1], vec![1, 0]),
                // "2" repeats, but the outer change opens a new inner instance
                (vec![0, 1], vec![1, 0]),
            ]
        );
    }

    #[test]
    fn cursor_is_rerunnable() {
        let source = source();
        let groups = groups();
        let mut cursor = RowCursor::new(&source, &groups);
        let first = cursor.advance().unwrap();
        cursor.advance().unwrap();
        cursor.reset();
        assert_eq!(cursor.advance().unwrap(), first);
        assert_eq!(cursor.key(1), vec![Value::from("x"), Value::from("1")]);
    }

    #[test]
    fn no_groups_yields_item_bands_only() {
        let source = source();
        let (tree, instances) = build_content(&source, &[], &BandSizes::default()).unwrap();
        assert_eq!(tree.len(), 4);
        assert!(instances.is_empty());
        assert!(tree.bands().iter().all(|b| b.kind.is_item()));
    }

    #[test]
    fn header_keeps_previous_inner_instance() {
        let source = source();
        let (tree, instances) =
            build_content(&source, &groups(), &BandSizes::uniform(10.0)).unwrap();

        assert_eq!(instances.len(), 5);
        assert_eq!(instances[0].end_row, 2);
        assert_eq!(instances[3].key, vec![Value::from("y")]);

        // Outer header for the second A instance still sees the last B instance.
        let header = tree
            .bands()
            .iter()
            .filter(|b| b.kind == BandKind::GroupHeader { level: 0 })
            .nth(1)
            .unwrap();
        assert_eq!(header.groups, vec![Some(GroupInstanceId(3)), Some(GroupInstanceId(2))]);
        assert_eq!(tree.span(GroupInstanceId(2)).end_row, 2);
    }
}
