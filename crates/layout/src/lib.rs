use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Band has a height of {0:.2} which exceeds the total page content height of {1:.2}.")]
    ElementTooLarge(f32, f32),
    #[error("Page height must be positive, got {0:.2}.")]
    InvalidPageHeight(f32),
}

pub mod algorithms;
pub mod config;
pub mod content;
pub mod flow;
pub mod interface;
pub mod output;

pub use self::config::{BandSizes, FlowLayoutConfig, LevelSizes};
pub use self::content::{Band, BandKind, ContentTree, GroupSpan, LevelPolicy};
pub use self::flow::FlowLayout;
pub use self::interface::LayoutEngine;
pub use self::output::{PageSlice, Pagination, Placement, PlacementRole};
