//! Capability-based normalizer registry and pre-commit pipeline.
//!
//! # Responsibility
//! - Resolve every normalizer registered for an entity's capability tags.
//! - Run them on entities, in bulk or from the repository save interceptor.
//! - Provide the diacritic-folding text rules used by concrete normalizers.
//!
//! # Invariants
//! - Registrations are immutable once the registry is built.
//! - Resolution keeps registration order; one normalizer per registration.
//! - Normalizers mutate the entity they are given and never stage writes.

use thiserror::Error;

pub mod capability;
pub mod context;
pub mod interceptor;
pub mod normalizer;
pub mod registry;
pub mod text;

pub use capability::{
    capability_closure, matching_indexes, resolution_table, Capability, HasCapability,
};
pub use context::NormalizeContext;
pub use interceptor::{NormalizingInterceptor, NormalizingPrimer};
pub use normalizer::{DefaultEntityNormalizer, EntityNormalizer, Normalizable};
pub use registry::{NormalizerRegistry, NormalizerRegistryBuilder};
pub use text::{join_normalized, normalize_text};

pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
    /// A normalizer tried to run a statement that writes.
    #[error("normalizers may only read; rejected statement: {0}")]
    WriteAttempt(String),
    #[error("entity cannot be normalized: {0}")]
    InvalidEntity(String),
}
