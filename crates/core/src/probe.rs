//! Cross-checks of frozen function values against expectations.
//!
//! A probe never aborts a run. It returns the list of item nodes whose value
//! disagrees with the expectation, which is empty for a correct report.

use std::cmp::Ordering;

use tally_types::{FunctionName, Value};

use crate::report::PaginatedReport;
use crate::source::{DataSource, SourceError};

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeMismatch {
    pub page: usize,
    pub row: usize,
    pub function: FunctionName,
    pub expected: Value,
    pub actual: Value,
}

/// Compares a function's value on every item node with a column of the
/// node's row. Rows where the column is null are not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationProbe {
    pub function: FunctionName,
    pub expected_field: String,
}

impl ValidationProbe {
    pub fn new(function: impl Into<FunctionName>, expected_field: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            expected_field: expected_field.into(),
        }
    }

    pub fn check<S: DataSource + ?Sized>(
        &self,
        report: &PaginatedReport,
        source: &S,
    ) -> Result<Vec<ProbeMismatch>, SourceError> {
        let mut mismatches = Vec::new();
        for page in report.pages() {
            for node in page.items() {
                let expected = source.value_at(node.row(), &self.expected_field)?;
                if expected.is_null() {
                    continue;
                }
                let actual = node.value(self.function.as_str());
                if !same_value(&expected, &actual) {
                    mismatches.push(ProbeMismatch {
                        page: page.index(),
                        row: node.row(),
                        function: self.function.clone(),
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(mismatches)
    }
}

/// Compares two functions that should agree on every item node, such as a
/// page-scoped count and an independent recomputation of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowCheck {
    pub function: FunctionName,
    pub shadow: FunctionName,
}

impl ShadowCheck {
    pub fn new(function: impl Into<FunctionName>, shadow: impl Into<FunctionName>) -> Self {
        Self {
            function: function.into(),
            shadow: shadow.into(),
        }
    }

    pub fn check(&self, report: &PaginatedReport) -> Vec<ProbeMismatch> {
        report
            .pages()
            .flat_map(|page| {
                page.items().into_iter().filter_map(move |node| {
                    let expected = node.value(self.shadow.as_str());
                    let actual = node.value(self.function.as_str());
                    (!same_value(&expected, &actual)).then(|| ProbeMismatch {
                        page: page.index(),
                        row: node.row(),
                        function: self.function.clone(),
                        expected,
                        actual,
                    })
                })
            })
            .collect()
    }
}

/// Numbers compare by value, so `2` from a JSON column matches a `2.0` sum.
fn same_value(a: &Value, b: &Value) -> bool {
    match a.numeric_cmp(b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}
