//! Caller-facing read and write contracts.

use crate::model::entity::Entity;
use crate::model::search::PagingInfo;
use crate::model::traits::{EntityTraits, KeyOf};
use crate::repo::cancel::CancellationToken;
use crate::repo::error::RepoResult;
use crate::repo::unit_of_work::EntryId;

/// Read contract for one entity bundle.
pub trait EntityReadService<T: EntityTraits> {
    /// One entity by key; `None` for the zero key or when no row matches.
    fn details(&self, id: KeyOf<T>) -> RepoResult<Option<T::Entity>>;

    /// Single-criteria listing; `None` lists every row.
    fn list(
        &self,
        so: Option<&T::SearchObject>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<T::Entity>>;

    /// Union of the rows matching any of `so`, sorted, with includes.
    fn list_many(
        &self,
        so: &[T::SearchObject],
        sort_by: &[T::SortBy],
        includes: Option<T::Includes>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<T::Entity>>;

    fn count(&self, so: Option<&T::SearchObject>) -> RepoResult<u64>;

    fn count_many(&self, so: &[T::SearchObject]) -> RepoResult<u64>;
}

/// Write contract layered on the read contract.
pub trait EntityRepositoryApi<T: EntityTraits>: EntityReadService<T> {
    /// Stages an insert.
    fn add(&mut self, item: T::Entity) -> RepoResult<EntryId>;

    /// Stages an update of the stored original; `None` when it is gone.
    fn modify(&mut self, item: T::Entity) -> RepoResult<Option<EntryId>>;

    /// Adds new entities and modifies existing ones.
    fn save(&mut self, item: T::Entity) -> RepoResult<Option<EntryId>> {
        if item.is_new() {
            self.add(item).map(Some)
        } else {
            self.modify(item)
        }
    }

    /// Stages a delete without checking the row still exists.
    fn remove(&mut self, item: T::Entity) -> RepoResult<EntryId>;

    /// Commits every staged change atomically; returns affected rows.
    fn save_changes(&mut self, token: &CancellationToken) -> RepoResult<usize>;
}

impl<T: EntityTraits, R: EntityReadService<T> + ?Sized> EntityReadService<T> for &R {
    fn details(&self, id: KeyOf<T>) -> RepoResult<Option<T::Entity>> {
        (**self).details(id)
    }

    fn list(
        &self,
        so: Option<&T::SearchObject>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<T::Entity>> {
        (**self).list(so, paging)
    }

    fn list_many(
        &self,
        so: &[T::SearchObject],
        sort_by: &[T::SortBy],
        includes: Option<T::Includes>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<T::Entity>> {
        (**self).list_many(so, sort_by, includes, paging)
    }

    fn count(&self, so: Option<&T::SearchObject>) -> RepoResult<u64> {
        (**self).count(so)
    }

    fn count_many(&self, so: &[T::SearchObject]) -> RepoResult<u64> {
        (**self).count_many(so)
    }
}
