// src/error.rs
//! Defines the error types for report preparation and pagination.

use crate::layout::LayoutError;
use crate::source::SourceError;
use tally_types::{FunctionName, GroupName};
use thiserror::Error;

/// Problems with the report definition, reported before any row is evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Function '{0}' is declared more than once.")]
    DuplicateFunction(FunctionName),
    #[error("Group '{0}' is declared more than once.")]
    DuplicateGroup(GroupName),
    #[error("Group '{0}' has no fields.")]
    EmptyGroup(GroupName),
    #[error("Function '{function}' refers to unknown group '{group}'.")]
    UnknownGroup { function: FunctionName, group: String },
    #[error("Function '{function}' reads unknown function '{input}'.")]
    UnknownFunctionInput {
        function: FunctionName,
        input: FunctionName,
    },
    #[error(
        "Function '{reader}' (level {reader_level}) cannot read '{target}' (level {target_level}); inputs must have a strictly lower dependency level."
    )]
    DependencyOrder {
        reader: FunctionName,
        reader_level: u32,
        target: FunctionName,
        target_level: u32,
    },
    #[error("Function '{function}' of kind {kind} needs an input.")]
    MissingInput {
        function: FunctionName,
        kind: &'static str,
    },
    #[error("Field '{field}' used by {owner} is not provided by the data source.")]
    UnknownField { owner: String, field: String },
}

/// The main error enum for a pagination run. Any of these aborts the run;
/// no partial report is produced.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Pagination did not converge within {passes} layout passes.")]
    Convergence { passes: usize },
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("Data source failed: {0}")]
    Source(#[from] SourceError),
}
