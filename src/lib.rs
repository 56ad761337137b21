//! # tally
//!
//! Page-aware incremental aggregation for banded, paginated reports.
//!
//! This is the facade crate. It re-exports the workspace crates and adds the
//! JSON report document used by the `tally` binary.

pub mod document;
pub mod error;

pub use tally_core as engine;
pub use tally_layout as layout;
pub use tally_source as source;
pub use tally_types as types;

pub use document::{ReportDocument, render_listing};
pub use error::DocumentError;

pub use tally_core::{
    AggregationKind, ConfigError, EngineConfig, EvaluationContext, FunctionConfig,
    GroupDefinition, Mode, PaginatedReport, PreparedReport, ProbeMismatch, RenderNodeId,
    ReportDefinition, ReportError, Scope, ShadowCheck, ValidationProbe,
};
pub use tally_layout::{BandSizes, FlowLayout, FlowLayoutConfig, LayoutEngine, Pagination};
pub use tally_source::{DataSource, SourceError, TableDataSource};
pub use tally_types::{FunctionName, GroupName, Value};
