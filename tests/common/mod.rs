pub mod fixtures;

use tally::engine::RenderedNode;
use tally::{
    DataSource, EvaluationContext, FlowLayout, PaginatedReport, PreparedReport, ReportDefinition,
    ReportError,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Prepare and paginate with the reference flow layout.
pub fn paginate<S: DataSource>(
    definition: ReportDefinition,
    source: &S,
    page_height: f32,
) -> Result<PaginatedReport, ReportError> {
    let report = PreparedReport::prepare(definition)?;
    report.paginate(
        &EvaluationContext::default(),
        source,
        &FlowLayout::with_page_height(page_height),
    )
}

/// Integer values of `function` on `nodes`; `None` where the value is null.
pub fn ints(nodes: &[RenderedNode<'_>], function: &str) -> Vec<Option<i64>> {
    nodes.iter().map(|n| n.value(function).as_i64()).collect()
}

/// Compares observed values with expectations, skipping `None` expectations.
pub fn assert_matches_where_defined(actual: &[Option<i64>], expected: &[Option<i64>], what: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: expected {} nodes, got {:?}",
        what,
        expected.len(),
        actual
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        if e.is_some() {
            assert_eq!(a, e, "{}: node {} of {:?}", what, i, actual);
        }
    }
}
