//! Per-entity preparation steps run as a save interceptor.

use crate::repo::error::RepoResult;
use crate::repo::interceptor::SaveInterceptor;
use rusqlite::Connection;
use std::sync::Arc;

/// Prepares one staged insert/update entity right before commit.
pub trait EntityPrimer<E: ?Sized>: Send + Sync {
    /// Primers returning `false` are skipped for `entity`.
    fn can_prime(&self, _entity: &E) -> bool {
        true
    }

    fn prime(&self, conn: &Connection, entity: &mut E) -> RepoResult<()>;
}

/// Runs a list of primers, in order, from the repository save pipeline.
pub struct PrimerInterceptor<E: ?Sized> {
    primers: Vec<Arc<dyn EntityPrimer<E>>>,
}

impl<E: ?Sized> Default for PrimerInterceptor<E> {
    fn default() -> Self {
        Self {
            primers: Vec::new(),
        }
    }
}

impl<E: ?Sized> PrimerInterceptor<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primer(mut self, primer: Arc<dyn EntityPrimer<E>>) -> Self {
        self.primers.push(primer);
        self
    }

    pub fn len(&self) -> usize {
        self.primers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primers.is_empty()
    }
}

impl<E> SaveInterceptor<E> for PrimerInterceptor<E> {
    fn saving(&self, conn: &Connection, entity: &mut E) -> RepoResult<()> {
        for primer in &self.primers {
            if primer.can_prime(entity) {
                primer.prime(conn, entity)?;
            }
        }
        Ok(())
    }
}
