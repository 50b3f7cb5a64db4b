//! Entity manager facade.
//!
//! # Responsibility
//! - Expose the read and write contracts of one entity bundle.
//! - Delegate every call to the wrapped repository implementation.
//!
//! # Invariants
//! - The manager never bypasses the repository unit of work.
//! - The manager stays storage-agnostic.

use crate::model::search::PagingInfo;
use crate::model::traits::{EntityTraits, KeyOf};
use crate::repo::cancel::CancellationToken;
use crate::repo::contract::{EntityReadService, EntityRepositoryApi};
use crate::repo::error::RepoResult;
use crate::repo::unit_of_work::EntryId;
use std::marker::PhantomData;

/// Use-case wrapper over any repository of one entity bundle.
pub struct EntityManager<T, R> {
    repo: R,
    _bundle: PhantomData<fn() -> T>,
}

impl<T, R> EntityManager<T, R>
where
    T: EntityTraits,
    R: EntityReadService<T>,
{
    /// Creates a manager using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _bundle: PhantomData,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn into_inner(self) -> R {
        self.repo
    }
}

impl<T, R> EntityManager<T, R>
where
    T: EntityTraits,
    R: EntityRepositoryApi<T>,
{
    /// Saves every item and commits them together.
    ///
    /// # Contract
    /// - New items are added, existing ones modified (see [`EntityRepositoryApi::save`]).
    /// - Returns the affected row count of the single commit.
    pub fn save_many(
        &mut self,
        items: impl IntoIterator<Item = T::Entity>,
        token: &CancellationToken,
    ) -> RepoResult<usize> {
        for item in items {
            self.repo.save(item)?;
        }
        self.repo.save_changes(token)
    }
}

impl<T, R> EntityReadService<T> for EntityManager<T, R>
where
    T: EntityTraits,
    R: EntityReadService<T>,
{
    fn details(&self, id: KeyOf<T>) -> RepoResult<Option<T::Entity>> {
        self.repo.details(id)
    }

    fn list(
        &self,
        so: Option<&T::SearchObject>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<T::Entity>> {
        self.repo.list(so, paging)
    }

    fn list_many(
        &self,
        so: &[T::SearchObject],
        sort_by: &[T::SortBy],
        includes: Option<T::Includes>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<T::Entity>> {
        self.repo.list_many(so, sort_by, includes, paging)
    }

    fn count(&self, so: Option<&T::SearchObject>) -> RepoResult<u64> {
        self.repo.count(so)
    }

    fn count_many(&self, so: &[T::SearchObject]) -> RepoResult<u64> {
        self.repo.count_many(so)
    }
}

impl<T, R> EntityRepositoryApi<T> for EntityManager<T, R>
where
    T: EntityTraits,
    R: EntityRepositoryApi<T>,
{
    fn add(&mut self, item: T::Entity) -> RepoResult<EntryId> {
        self.repo.add(item)
    }

    fn modify(&mut self, item: T::Entity) -> RepoResult<Option<EntryId>> {
        self.repo.modify(item)
    }

    fn save(&mut self, item: T::Entity) -> RepoResult<Option<EntryId>> {
        self.repo.save(item)
    }

    fn remove(&mut self, item: T::Entity) -> RepoResult<EntryId> {
        self.repo.remove(item)
    }

    fn save_changes(&mut self, token: &CancellationToken) -> RepoResult<usize> {
        self.repo.save_changes(token)
    }
}
