use crate::LayoutError;
use crate::content::ContentTree;
use crate::output::Pagination;

/// The size-driven layout collaborator.
///
/// Implementations must be pure functions of the band sizes in the tree:
/// calling `layout` twice on the same tree yields the same pagination. The
/// aggregation engine relies on this to detect convergence.
pub trait LayoutEngine {
    /// The authoritative pagination of `tree`.
    fn layout(&self, tree: &ContentTree) -> Result<Pagination, LayoutError>;

    /// A first, possibly cheaper, guess at the pagination. The engine
    /// evaluates against it before asking for the authoritative layout.
    fn propose(&self, tree: &ContentTree) -> Result<Pagination, LayoutError> {
        self.layout(tree)
    }
}

impl<T: LayoutEngine + ?Sized> LayoutEngine for &T {
    fn layout(&self, tree: &ContentTree) -> Result<Pagination, LayoutError> {
        (**self).layout(tree)
    }

    fn propose(&self, tree: &ContentTree) -> Result<Pagination, LayoutError> {
        (**self).propose(tree)
    }
}
