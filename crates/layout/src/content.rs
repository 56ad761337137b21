//! The content tree handed to the layout engine.
//!
//! A report is flattened into a sequence of bands: a header for every group
//! level that opens at a row, one item band per row, and a footer for every
//! level that closes after it. Each band remembers which group instance was
//! current at every level when it was emitted, so later stages never need to
//! re-run the row cursor to answer "which scope does this band belong to".

use tally_types::{BandId, GroupInstanceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandKind {
    GroupHeader { level: usize },
    Item,
    GroupFooter { level: usize },
}

impl BandKind {
    pub fn is_item(&self) -> bool {
        matches!(self, BandKind::Item)
    }

    pub fn level(&self) -> Option<usize> {
        match self {
            BandKind::GroupHeader { level } | BandKind::GroupFooter { level } => Some(*level),
            BandKind::Item => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub id: BandId,
    pub kind: BandKind,
    /// Row ordinal the band was emitted for.
    pub row: usize,
    pub height: f32,
    /// Current group instance per level, outer to inner. `None` until the
    /// level is entered for the first time.
    pub groups: Vec<Option<GroupInstanceId>>,
}

impl Band {
    pub fn group_at(&self, level: usize) -> Option<GroupInstanceId> {
        self.groups.get(level).copied().flatten()
    }
}

/// The header and footer bands that delimit one group instance.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpan {
    pub id: GroupInstanceId,
    pub level: usize,
    pub header: BandId,
    pub footer: Option<BandId>,
    pub start_row: usize,
    pub end_row: usize,
}

/// Per-level repetition flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelPolicy {
    pub repeat_header: bool,
    pub repeat_footer: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentTree {
    levels: Vec<LevelPolicy>,
    bands: Vec<Band>,
    spans: Vec<GroupSpan>,
}

impl ContentTree {
    pub fn new(levels: Vec<LevelPolicy>) -> Self {
        Self {
            levels,
            bands: Vec::new(),
            spans: Vec::new(),
        }
    }

    pub fn push_band(
        &mut self,
        kind: BandKind,
        row: usize,
        height: f32,
        groups: Vec<Option<GroupInstanceId>>,
    ) -> BandId {
        let id = BandId::from(self.bands.len());
        self.bands.push(Band {
            id,
            kind,
            row,
            height,
            groups,
        });
        id
    }

    /// Registers a new group instance. Instances must be opened in id order.
    pub fn open_span(&mut self, id: GroupInstanceId, level: usize, header: BandId, start_row: usize) {
        debug_assert_eq!(id.0 as usize, self.spans.len());
        self.spans.push(GroupSpan {
            id,
            level,
            header,
            footer: None,
            start_row,
            end_row: start_row,
        });
    }

    pub fn close_span(&mut self, id: GroupInstanceId, footer: BandId, end_row: usize) {
        if let Some(span) = self.spans.get_mut(id.0 as usize) {
            span.footer = Some(footer);
            span.end_row = end_row;
        }
    }

    pub fn levels(&self) -> &[LevelPolicy] {
        &self.levels
    }

    pub fn level_policy(&self, level: usize) -> LevelPolicy {
        self.levels.get(level).copied().unwrap_or_default()
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band(&self, id: BandId) -> &Band {
        &self.bands[id.index()]
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn spans(&self) -> &[GroupSpan] {
        &self.spans
    }

    pub fn span(&self, id: GroupInstanceId) -> &GroupSpan {
        &self.spans[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_numbered_in_push_order() {
        let mut tree = ContentTree::new(vec![LevelPolicy::default()]);
        let g = GroupInstanceId(0);
        let h = tree.push_band(BandKind::GroupHeader { level: 0 }, 0, 10.0, vec![Some(g)]);
        tree.open_span(g, 0, h, 0);
        let i = tree.push_band(BandKind::Item, 0, 10.0, vec![Some(g)]);
        let f = tree.push_band(BandKind::GroupFooter { level: 0 }, 0, 10.0, vec![Some(g)]);
        tree.close_span(g, f, 0);

        assert_eq!(tree.len(), 3);
        assert_eq!(i, BandId(1));
        assert_eq!(tree.span(g).footer, Some(f));
        assert_eq!(tree.band(i).group_at(0), Some(g));
        assert_eq!(tree.band(i).group_at(3), None);
        assert_eq!(tree.band(f).kind.level(), Some(0));
        assert_eq!(tree.levels(), &[LevelPolicy::default()]);
        assert_eq!(tree.spans().len(), 1);
        assert_eq!(tree.spans()[0].header, h);
    }
}
