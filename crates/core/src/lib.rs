//! # tally-core
//!
//! Page-aware incremental aggregation for banded reports.
//!
//! This crate evaluates a set of dependency-ordered aggregation functions over
//! a tabular data source organized into nested groups:
//! - **definition**: groups, functions and their scopes, as configured
//! - **cursor**: row iteration with group tracking, and the content tree
//! - **registry**: validation and evaluation order
//! - **scope**: the per-function scope-reset state machine
//! - **evaluator**: band-by-band evaluation and page-dependent replay
//! - **feedback**: the bounded layout/evaluation loop
//! - **sink**: frozen per-node values
//! - **probe**: cross-checks of frozen values
//!
//! ## Design Principle
//!
//! Page-scoped values depend on page boundaries that only a layout pass can
//! produce, while the layout consumes the bands those values are attached to.
//! The engine evaluates against a proposal, confirms it with the
//! authoritative layout, and replays only the functions whose values depend
//! on pages.

// Re-export foundation crates
pub use tally_layout as layout;
pub use tally_source as source;
pub use tally_types as types;

pub mod aggregate;
pub mod config;
pub mod cursor;
pub mod definition;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod probe;
pub mod registry;
pub mod report;
pub mod scope;
pub mod sink;

pub use config::{EngineConfig, EvaluationContext};
pub use cursor::{GroupInstance, RowCursor, RowTransition, build_content};
pub use definition::{
    AggregationKind, FunctionConfig, GroupDefinition, GroupRef, Input, Mode, ReportDefinition,
    Scope,
};
pub use error::{ConfigError, ReportError};
pub use probe::{ProbeMismatch, ShadowCheck, ValidationProbe};
pub use registry::FunctionRegistry;
pub use report::{PaginatedReport, PreparedReport, RenderedNode, RenderedPage};
pub use sink::{AttributeSink, RenderNodeId};
pub use types::{FunctionName, GroupName, Value};
