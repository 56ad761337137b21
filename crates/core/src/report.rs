//! Preparing a report definition and running it to a finished pagination.

use log::info;
use tally_types::Value;

use crate::config::EvaluationContext;
use crate::cursor::{GroupInstance, build_content};
use crate::definition::ReportDefinition;
use crate::error::{ConfigError, ReportError};
use crate::evaluator::Evaluator;
use crate::feedback::FeedbackLoop;
use crate::layout::{Band, BandKind, ContentTree, LayoutEngine, Pagination, PlacementRole};
use crate::registry::{FunctionRegistry, group_chain};
use crate::sink::{AttributeSink, RenderNodeId};
use crate::source::DataSource;

/// A validated report definition. Can be paginated any number of times;
/// every run starts from a clean accumulator table.
#[derive(Debug, Clone)]
pub struct PreparedReport {
    definition: ReportDefinition,
    registry: FunctionRegistry,
}

impl PreparedReport {
    pub fn prepare(definition: ReportDefinition) -> Result<Self, ConfigError> {
        let registry = FunctionRegistry::prepare(&definition.groups, &definition.functions)?;
        Ok(Self {
            definition,
            registry,
        })
    }

    pub fn definition(&self) -> &ReportDefinition {
        &self.definition
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn paginate<S, L>(
        &self,
        ctx: &EvaluationContext,
        source: &S,
        layout: &L,
    ) -> Result<PaginatedReport, ReportError>
    where
        S: DataSource + ?Sized,
        L: LayoutEngine + ?Sized,
    {
        self.registry.check_fields(source)?;
        info!(
            "Paginating {} rows, groups [{}], {} functions.",
            source.row_count(),
            group_chain(self.registry.groups()),
            self.registry.len()
        );

        let (tree, instances) =
            build_content(source, &self.definition.groups, &self.definition.band_sizes)?;
        let converged = {
            let mut evaluator = Evaluator::new(&self.registry, &tree, source)?;
            FeedbackLoop::new(ctx, layout, &tree).run(&mut evaluator)?
        };

        Ok(PaginatedReport {
            tree,
            instances,
            pagination: converged.pagination,
            sink: converged.sink,
            passes: converged.passes,
            replayed_bands: converged.replayed_bands,
            namespace: ctx.namespace().to_string(),
        })
    }
}

/// A finished run: the confirmed pagination and the frozen value of every
/// function on every rendered node.
#[derive(Debug)]
pub struct PaginatedReport {
    tree: ContentTree,
    instances: Vec<GroupInstance>,
    pagination: Pagination,
    sink: AttributeSink,
    passes: usize,
    replayed_bands: usize,
    namespace: String,
}

impl PaginatedReport {
    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn instances(&self) -> &[GroupInstance] {
        &self.instances
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn sink(&self) -> &AttributeSink {
        &self.sink
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn replayed_bands(&self) -> usize {
        self.replayed_bands
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count()
    }

    pub fn page(&self, index: usize) -> Option<RenderedPage<'_>> {
        (index < self.page_count()).then_some(RenderedPage {
            report: self,
            index,
        })
    }

    pub fn pages(&self) -> impl Iterator<Item = RenderedPage<'_>> {
        (0..self.page_count()).map(|index| RenderedPage {
            report: self,
            index,
        })
    }

    /// The frozen value of `function` on `node`.
    pub fn value(&self, node: RenderNodeId, function: &str) -> Option<&Value> {
        self.sink.attribute(node, &self.namespace, function)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderedPage<'r> {
    report: &'r PaginatedReport,
    index: usize,
}

impl<'r> RenderedPage<'r> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Every node on the page in reading order.
    pub fn nodes(&self) -> Vec<RenderedNode<'r>> {
        let report = self.report;
        report
            .pagination
            .placements(self.index)
            .into_iter()
            .map(|placement| RenderedNode {
                report,
                id: RenderNodeId::new(self.index, placement),
                band: report.tree.band(placement.band),
            })
            .collect()
    }

    /// Header nodes of `level`, repeated ones included.
    pub fn headers(&self, level: usize) -> Vec<RenderedNode<'r>> {
        self.of_kind(BandKind::GroupHeader { level })
    }

    /// Footer nodes of `level`, repeated ones included.
    pub fn footers(&self, level: usize) -> Vec<RenderedNode<'r>> {
        self.of_kind(BandKind::GroupFooter { level })
    }

    /// Header nodes of every level, in reading order.
    pub fn group_headers(&self) -> Vec<RenderedNode<'r>> {
        self.filtered(|kind| matches!(kind, BandKind::GroupHeader { .. }))
    }

    /// Footer nodes of every level, in reading order.
    pub fn group_footers(&self) -> Vec<RenderedNode<'r>> {
        self.filtered(|kind| matches!(kind, BandKind::GroupFooter { .. }))
    }

    pub fn items(&self) -> Vec<RenderedNode<'r>> {
        self.of_kind(BandKind::Item)
    }

    fn of_kind(&self, kind: BandKind) -> Vec<RenderedNode<'r>> {
        self.filtered(|k| k == kind)
    }

    fn filtered(&self, keep: impl Fn(BandKind) -> bool) -> Vec<RenderedNode<'r>> {
        self.nodes()
            .into_iter()
            .filter(|node| keep(node.band.kind))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderedNode<'r> {
    report: &'r PaginatedReport,
    pub id: RenderNodeId,
    pub band: &'r Band,
}

impl RenderedNode<'_> {
    pub fn row(&self) -> usize {
        self.band.row
    }

    pub fn is_repeated(&self) -> bool {
        self.id.role != PlacementRole::Body
    }

    /// The value of `function` on this node; `Null` if it has none.
    pub fn value(&self, function: &str) -> Value {
        self.report
            .value(self.id, function)
            .cloned()
            .unwrap_or_default()
    }
}
