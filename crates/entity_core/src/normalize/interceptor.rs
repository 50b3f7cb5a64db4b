//! Save interceptor running the normalizer pipeline before commit.

use crate::normalize::capability::{Capability, HasCapability};
use crate::normalize::context::NormalizeContext;
use crate::normalize::normalizer::{DefaultEntityNormalizer, EntityNormalizer, Normalizable};
use crate::normalize::registry::NormalizerRegistry;
use crate::repo::error::RepoResult;
use crate::repo::interceptor::SaveInterceptor;
use crate::repo::primer::EntityPrimer;
use rusqlite::Connection;
use std::sync::Arc;

/// Runs a shared [`NormalizerRegistry`] on every entity a repository is about
/// to commit.
///
/// `view` projects the repository's concrete entity onto the registry's
/// subject type. Produces the same result as calling
/// [`NormalizerRegistry::apply`] on the same entities.
pub struct NormalizingInterceptor<C, T: ?Sized, E> {
    registry: Arc<NormalizerRegistry<C, T>>,
    view: fn(&mut E) -> &mut T,
}

impl<C, T: ?Sized, E> NormalizingInterceptor<C, T, E> {
    pub fn new(registry: Arc<NormalizerRegistry<C, T>>, view: fn(&mut E) -> &mut T) -> Self {
        Self { registry, view }
    }
}

impl<C, T, E> SaveInterceptor<E> for NormalizingInterceptor<C, T, E>
where
    C: Capability,
    T: ?Sized + HasCapability<C> + 'static,
    E: 'static,
{
    fn saving(&self, conn: &Connection, entity: &mut E) -> RepoResult<()> {
        let ctx = NormalizeContext::new(conn);
        self.registry.normalize_one(&ctx, (self.view)(entity))?;
        Ok(())
    }
}

/// Primer applying only [`DefaultEntityNormalizer`], without a registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizingPrimer;

impl<E: Normalizable + ?Sized> EntityPrimer<E> for NormalizingPrimer {
    fn prime(&self, conn: &Connection, entity: &mut E) -> RepoResult<()> {
        let ctx = NormalizeContext::new(conn);
        DefaultEntityNormalizer.normalize(&ctx, entity)?;
        Ok(())
    }
}
