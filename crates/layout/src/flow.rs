//! A band-stacking reference layout.
//!
//! Bands are stacked top to bottom. A page breaks before the first band that
//! would not leave room for the footers of every group still open after it.
//! Groups flagged for repetition get their header repeated at the top of the
//! next page and their footer repeated at the bottom of the broken page.

use crate::algorithms::pagination::check_band_fit;
use crate::config::FlowLayoutConfig;
use crate::content::{Band, BandKind, ContentTree};
use crate::interface::LayoutEngine;
use crate::output::{PageSlice, Pagination};
use crate::LayoutError;
use log::{debug, trace};
use tally_types::{BandId, GroupInstanceId};

#[derive(Debug, Clone, Default)]
pub struct FlowLayout {
    config: FlowLayoutConfig,
}

impl FlowLayout {
    pub fn new(config: FlowLayoutConfig) -> Self {
        Self { config }
    }

    pub fn with_page_height(page_height: f32) -> Self {
        Self::new(FlowLayoutConfig {
            page_height,
            ..FlowLayoutConfig::default()
        })
    }

    fn paginate(&self, tree: &ContentTree, repeats: bool) -> Result<Pagination, LayoutError> {
        let page_height = self.config.page_height;
        if page_height.is_nan() || page_height <= 0.0 {
            return Err(LayoutError::InvalidPageHeight(page_height));
        }

        let mut pages = Vec::new();
        let mut page = PageSlice::default();
        let mut open: Vec<GroupInstanceId> = Vec::new();
        let mut cursor_y: f32 = 0.0;
        let mut placed = 0usize;

        for (index, band) in tree.bands().iter().enumerate() {
            if band.height > page_height {
                return Err(LayoutError::ElementTooLarge(band.height, page_height));
            }

            let open_after = open_groups_after(&open, band);
            let reserved = if repeats {
                footer_reserve(tree, &open_after)
            } else {
                0.0
            };

            let fit = check_band_fit(cursor_y, band.height, reserved, page_height);
            if fit.should_break && placed > 0 {
                page.end = index;
                if repeats {
                    page.repeated_footers = repeated_footers(tree, &open);
                }
                trace!(
                    "[LAYOUT] Break before {} (row {}), {:.2} remaining.",
                    band.id, band.row, fit.remaining_height
                );
                pages.push(std::mem::take(&mut page));

                page.start = index;
                cursor_y = 0.0;
                if repeats {
                    page.repeated_headers = repeated_headers(tree, &open);
                    cursor_y = page
                        .repeated_headers
                        .iter()
                        .map(|h| tree.band(*h).height)
                        .sum();
                }
                placed = 0;
            }

            cursor_y += band.height;
            placed += 1;
            open = open_after;
        }

        page.end = tree.len();
        pages.push(page);
        debug!(
            "[LAYOUT] {} bands on {} pages (repeats: {}).",
            tree.len(),
            pages.len(),
            repeats
        );
        Ok(Pagination::new(pages))
    }
}

impl LayoutEngine for FlowLayout {
    fn layout(&self, tree: &ContentTree) -> Result<Pagination, LayoutError> {
        self.paginate(tree, self.config.honor_repeats)
    }

    /// Stacks bands without reserving room for repeated group bands. Cheap,
    /// and usually breaks later than the authoritative layout.
    fn propose(&self, tree: &ContentTree) -> Result<Pagination, LayoutError> {
        self.paginate(tree, false)
    }
}

fn open_groups_after(open: &[GroupInstanceId], band: &Band) -> Vec<GroupInstanceId> {
    let mut after = open.to_vec();
    match band.kind {
        BandKind::GroupHeader { level } => {
            after.truncate(level);
            after.extend(band.group_at(level));
        }
        BandKind::GroupFooter { level } => after.truncate(level),
        BandKind::Item => {}
    }
    after
}

fn footer_reserve(tree: &ContentTree, open: &[GroupInstanceId]) -> f32 {
    repeated_footers(tree, open)
        .iter()
        .map(|f| tree.band(*f).height)
        .sum()
}

fn repeated_headers(tree: &ContentTree, open: &[GroupInstanceId]) -> Vec<BandId> {
    open.iter()
        .map(|id| tree.span(*id))
        .filter(|span| tree.level_policy(span.level).repeat_header)
        .map(|span| span.header)
        .collect()
}

fn repeated_footers(tree: &ContentTree, open: &[GroupInstanceId]) -> Vec<BandId> {
    open.iter()
        .rev()
        .map(|id| tree.span(*id))
        .filter(|span| tree.level_policy(span.level).repeat_footer)
        .filter_map(|span| span.footer)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::LevelPolicy;

    /// One group level; instances of `sizes[i]` rows each, all bands 10pt.
    fn grouped_tree(sizes: &[usize], policy: LevelPolicy) -> ContentTree {
        let mut tree = ContentTree::new(vec![policy]);
        let mut row = 0;
        for (i, size) in sizes.iter().enumerate() {
            let g = GroupInstanceId(i as u32);
            let h = tree.push_band(BandKind::GroupHeader { level: 0 }, row, 10.0, vec![Some(g)]);
            tree.open_span(g, 0, h, row);
            for _ in 0..*size {
                tree.push_band(BandKind::Item, row, 10.0, vec![Some(g)]);
                row += 1;
            }
            let f = tree.push_band(BandKind::GroupFooter { level: 0 }, row - 1, 10.0, vec![Some(g)]);
            tree.close_span(g, f, row - 1);
        }
        tree
    }

    #[test]
    fn stacks_until_full() {
        let tree = grouped_tree(&[6], LevelPolicy::default());
        let layout = FlowLayout::with_page_height(40.0);

        let pagination = layout.layout(&tree).unwrap();
        let ranges: Vec<_> = pagination.pages().iter().map(|p| p.bands()).collect();
        assert_eq!(ranges, vec![0..4, 4..8]);
        assert_eq!(pagination.cut_points(&tree), vec![3]);
    }

    #[test]
    fn repeats_reserve_footer_space() {
        let policy = LevelPolicy {
            repeat_header: true,
            repeat_footer: true,
        };
        let tree = grouped_tree(&[6], policy);
        let layout = FlowLayout::with_page_height(40.0);

        let pagination = layout.layout(&tree).unwrap();
        let first = &pagination.pages()[0];
        // header + 2 items + reserved footer
        assert_eq!(first.bands(), 0..3);
        assert_eq!(first.repeated_footers, vec![BandId(7)]);
        assert_eq!(pagination.pages()[1].repeated_headers, vec![BandId(0)]);
    }

    #[test]
    fn proposal_ignores_repeats() {
        let policy = LevelPolicy {
            repeat_header: true,
            repeat_footer: true,
        };
        let tree = grouped_tree(&[6], policy);
        let layout = FlowLayout::with_page_height(40.0);

        let proposal = layout.propose(&tree).unwrap();
        let authoritative = layout.layout(&tree).unwrap();
        assert!(proposal.pages().iter().all(|p| p.repeated_headers.is_empty()));
        assert_eq!(proposal.first_divergence(&authoritative), Some(0));
    }

    #[test]
    fn layout_is_deterministic() {
        let policy = LevelPolicy {
            repeat_header: true,
            repeat_footer: false,
        };
        let tree = grouped_tree(&[3, 5, 2], policy);
        let layout = FlowLayout::with_page_height(50.0);

        assert_eq!(layout.layout(&tree).unwrap(), layout.layout(&tree).unwrap());
    }

    #[test]
    fn oversized_band_is_an_error() {
        let tree = grouped_tree(&[1], LevelPolicy::default());
        let layout = FlowLayout::with_page_height(5.0);

        assert!(matches!(
            layout.layout(&tree),
            Err(LayoutError::ElementTooLarge(h, p)) if h == 10.0 && p == 5.0
        ));
    }

    #[test]
    fn rejects_non_positive_page_heights() {
        let tree = grouped_tree(&[1], LevelPolicy::default());
        for height in [0.0, -20.0, f32::NAN] {
            assert!(matches!(
                FlowLayout::with_page_height(height).layout(&tree),
                Err(LayoutError::InvalidPageHeight(_))
            ));
        }
    }

    #[test]
    fn empty_tree_is_one_empty_page() {
        let tree = ContentTree::new(Vec::new());
        let pagination = FlowLayout::default().layout(&tree).unwrap();
        assert_eq!(pagination.page_count(), 1);
        assert!(pagination.pages()[0].is_empty());
        assert!(pagination.cut_points(&tree).is_empty());
    }
}
