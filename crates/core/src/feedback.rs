//! The bounded layout/evaluation feedback loop.
//!
//! Values are first computed against the layout's proposal. Each following
//! pass asks for the authoritative layout and compares it page by page with
//! the pagination the values were computed against. A match ends the loop;
//! a difference replays the page-dependent functions from the first moved
//! page. The loop gives up after `max_passes` authoritative layouts.

use log::{debug, info, warn};

use crate::config::EvaluationContext;
use crate::error::ReportError;
use crate::evaluator::Evaluator;
use crate::layout::{ContentTree, LayoutEngine, Pagination};
use crate::sink::{AttributeSink, RenderNodeId};

/// The result of a converged run.
#[derive(Debug)]
pub struct Converged {
    pub pagination: Pagination,
    pub sink: AttributeSink,
    /// Authoritative layouts requested, including the confirming one.
    pub passes: usize,
    /// Bands re-evaluated by replays across all passes.
    pub replayed_bands: usize,
}

pub struct FeedbackLoop<'a, L: LayoutEngine + ?Sized> {
    ctx: &'a EvaluationContext,
    layout: &'a L,
    tree: &'a ContentTree,
}

impl<'a, L: LayoutEngine + ?Sized> FeedbackLoop<'a, L> {
    pub fn new(ctx: &'a EvaluationContext, layout: &'a L, tree: &'a ContentTree) -> Self {
        Self { ctx, layout, tree }
    }

    pub fn run(&self, evaluator: &mut Evaluator<'_>) -> Result<Converged, ReportError> {
        let max_passes = self.ctx.max_passes();
        let mut sink = AttributeSink::new();
        let mut replayed_bands = 0;

        let mut assumed = self.layout.propose(self.tree)?;
        info!(
            "[PASS 0] Tentative evaluation of {} bands on {} proposed pages.",
            self.tree.len(),
            assumed.page_count()
        );
        evaluator.run(&assumed);
        self.record(evaluator, &assumed, &mut sink);

        for pass in 1..=max_passes {
            let confirmed = self.layout.layout(self.tree)?;
            let Some(page) = assumed.first_divergence(&confirmed) else {
                sink.finalize_all();
                info!(
                    "[PASS {}] Converged on {} pages, {} nodes finalized.",
                    pass,
                    confirmed.page_count(),
                    sink.len()
                );
                return Ok(Converged {
                    pagination: confirmed,
                    sink,
                    passes: pass,
                    replayed_bands,
                });
            };

            let from = replay_start(&assumed, &confirmed, page, self.tree.len());
            let discarded = sink.discard_pending();
            debug!(
                "[PASS {}] Page {} moved ({} -> {} pages); {} pending nodes discarded, replaying from band {}.",
                pass,
                page,
                assumed.page_count(),
                confirmed.page_count(),
                discarded,
                from
            );
            replayed_bands += evaluator.replay(from, &confirmed);
            self.record(evaluator, &confirmed, &mut sink);
            assumed = confirmed;
        }

        warn!(
            "Pagination still moving after {} passes; giving up.",
            max_passes
        );
        Err(ReportError::Convergence { passes: max_passes })
    }

    fn record(&self, evaluator: &Evaluator<'_>, pagination: &Pagination, sink: &mut AttributeSink) {
        let namespace = self.ctx.namespace();
        for page in 0..pagination.page_count() {
            for placement in pagination.placements(page) {
                let node = RenderNodeId::new(page, placement);
                for (name, value) in evaluator.snapshot(placement, page, pagination) {
                    sink.record(node, namespace, name.as_str(), value);
                }
            }
        }
    }
}

/// First band of the moved page, in whichever pagination places it earlier.
fn replay_start(assumed: &Pagination, confirmed: &Pagination, page: usize, band_count: usize) -> usize {
    [assumed.page(page), confirmed.page(page)]
        .into_iter()
        .flatten()
        .map(|p| p.start)
        .min()
        .unwrap_or(band_count)
}
