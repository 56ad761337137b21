//! Output types from the layout engine.
//!
//! A `Pagination` assigns every band of the content tree to exactly one page
//! and lists the bands the layout repeats at the top and bottom of each page.

use crate::content::ContentTree;
use std::ops::Range;
use tally_types::BandId;

/// One page: a contiguous range of bands plus repeated group bands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSlice {
    /// Index of the first band on the page.
    pub start: usize,
    /// One past the last band on the page.
    pub end: usize,
    /// Group headers repeated at the page top, outer to inner.
    pub repeated_headers: Vec<BandId>,
    /// Group footers repeated at the page bottom, inner to outer.
    pub repeated_footers: Vec<BandId>,
}

impl PageSlice {
    pub fn bands(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Why a band appears at a given position of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlacementRole {
    RepeatedHeader,
    Body,
    RepeatedFooter,
}

/// One placement of a band on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub band: BandId,
    pub role: PlacementRole,
}

impl Placement {
    pub fn is_repeated(&self) -> bool {
        self.role != PlacementRole::Body
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pagination {
    pages: Vec<PageSlice>,
}

impl Pagination {
    pub fn new(pages: Vec<PageSlice>) -> Self {
        Self { pages }
    }

    /// Everything on one page, nothing repeated.
    pub fn single_page(tree: &ContentTree) -> Self {
        Self::new(vec![PageSlice {
            start: 0,
            end: tree.len(),
            ..PageSlice::default()
        }])
    }

    pub fn pages(&self) -> &[PageSlice] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&PageSlice> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The page a band was placed on (ignoring repeated placements).
    pub fn page_of(&self, band: BandId) -> Option<usize> {
        let index = band.index();
        let page = self.pages.partition_point(|p| p.end <= index);
        self.pages
            .get(page)
            .filter(|p| p.bands().contains(&index))
            .map(|_| page)
    }

    /// Page index for every band, indexed by band position.
    pub fn page_map(&self, band_count: usize) -> Vec<usize> {
        let mut map = vec![0; band_count];
        for (page, slice) in self.pages.iter().enumerate() {
            for band in slice.bands() {
                if let Some(slot) = map.get_mut(band) {
                    *slot = page;
                }
            }
        }
        map
    }

    /// Row ordinal of the first band of every page after the first.
    pub fn cut_points(&self, tree: &ContentTree) -> Vec<usize> {
        self.pages
            .iter()
            .skip(1)
            .filter(|p| !p.is_empty())
            .map(|p| tree.bands()[p.start].row)
            .collect()
    }

    /// The first page whose slice differs from `other`, if any.
    pub fn first_divergence(&self, other: &Pagination) -> Option<usize> {
        let common = self.pages.len().min(other.pages.len());
        (0..common)
            .find(|&i| self.pages[i] != other.pages[i])
            .or_else(|| (self.pages.len() != other.pages.len()).then_some(common))
    }

    /// Every placement on a page in reading order: repeated headers, the
    /// page's own bands, then repeated footers.
    pub fn placements(&self, page: usize) -> Vec<Placement> {
        let Some(slice) = self.pages.get(page) else {
            return Vec::new();
        };
        let place = |role: PlacementRole| move |band: &BandId| Placement { band: *band, role };
        slice
            .repeated_headers
            .iter()
            .map(place(PlacementRole::RepeatedHeader))
            .chain(slice.bands().map(|i| Placement {
                band: BandId::from(i),
                role: PlacementRole::Body,
            }))
            .chain(slice.repeated_footers.iter().map(place(PlacementRole::RepeatedFooter)))
            .collect()
    }
}
