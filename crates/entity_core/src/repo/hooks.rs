//! Per-entity customization points of the write repository.

/// Hooks a concrete repository can override; both default to no-ops.
pub trait RepositoryHooks<E> {
    /// Assigns defaults (timestamps, derived columns) before add/modify.
    fn prepare_item(&self, _item: &mut E) {}

    /// Reconciles the loaded original after the item's values were copied
    /// onto it, e.g. child collections the copy does not cover.
    fn modify_original(&self, _item: &E, _original: &mut E) {}
}

/// Repository without custom hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<E> RepositoryHooks<E> for NoHooks {}
