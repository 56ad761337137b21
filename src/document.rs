//! Self-contained report documents: engine settings, layout settings, the
//! report definition and its rows in one JSON file.
//!
//! ```json
//! {
//!   "engine": { "maxPasses": 3 },
//!   "layout": { "pageHeight": 300 },
//!   "definition": {
//!     "groups": [{ "name": "Region", "fields": ["Region"], "repeatHeader": true }],
//!     "functions": [{ "name": "n", "scope": "page:Region", "kind": "count", "mode": "total" }]
//!   },
//!   "rows": [{ "Region": "North" }, { "Region": "South" }]
//! }
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use itertools::Itertools;
use log::debug;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::DocumentError;
use tally_core::layout::{BandKind, FlowLayout, FlowLayoutConfig, PlacementRole};
use tally_core::{EngineConfig, EvaluationContext, PaginatedReport, PreparedReport, ReportDefinition};
use tally_source::TableDataSource;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub layout: FlowLayoutConfig,
    pub definition: ReportDefinition,
    /// Either `{"columns": [..], "rows": [[..]]}` or an array of row objects.
    pub rows: JsonValue,
}

impl ReportDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        debug!("Loading report document from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn source(&self) -> Result<TableDataSource, DocumentError> {
        Ok(TableDataSource::from_json(&self.rows)?)
    }

    /// Paginates the document with the reference flow layout.
    pub fn run(&self) -> Result<PaginatedReport, DocumentError> {
        let source = self.source()?;
        let report = PreparedReport::prepare(self.definition.clone())?;
        let ctx = EvaluationContext::new(self.engine.clone());
        let layout = FlowLayout::new(self.layout);
        Ok(report.paginate(&ctx, &source, &layout)?)
    }
}

/// A plain-text listing of every node and its function values, one page
/// after another.
pub fn render_listing(report: &PaginatedReport, functions: &[&str]) -> String {
    let mut out = String::new();
    for page in report.pages() {
        let bands = report.pagination().pages()[page.index()].bands();
        let _ = writeln!(out, "Page {} (bands {}..{})", page.index() + 1, bands.start, bands.end);
        for node in page.nodes() {
            let label = match node.band.kind {
                BandKind::GroupHeader { level } => format!("header {}", level),
                BandKind::Item => "item".to_string(),
                BandKind::GroupFooter { level } => format!("footer {}", level),
            };
            let marker = match node.id.role {
                PlacementRole::Body => "",
                PlacementRole::RepeatedHeader | PlacementRole::RepeatedFooter => " (repeated)",
            };
            let values = functions
                .iter()
                .map(|f| format!("{}={}", f, node.value(f)))
                .join(" ");
            let _ = writeln!(out, "  row {:>4}  {:<9}{:<11} {}", node.row(), label, marker, values);
        }
    }
    out
}
