//! Generic persistence core for keyed entities over SQLite.
//!
//! Query building with capability-scoped global filters, read/write
//! repositories with a unit of work, and a capability-resolved normalizer
//! pipeline that runs right before commit.

pub mod db;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod query;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, open_db_with, DbError, DbOptions, DbResult};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LoggingConfig,
    LoggingError,
};
pub use model::{
    Entity, EntityKey, EntityTraits, IncludeSet, KeyOf, NoIncludes, NoSort, OrderTerm,
    PagingInfo, SearchCriteria, SearchObject, SortDirection, SortKey,
};
pub use normalize::{
    Capability, DefaultEntityNormalizer, EntityNormalizer, HasCapability, Normalizable,
    NormalizeContext, NormalizeError, NormalizeResult, NormalizerRegistry,
    NormalizerRegistryBuilder, NormalizingInterceptor, NormalizingPrimer,
};
pub use query::{
    FilterGroup, FilterTarget, FilteredQueryBuilder, GlobalQueryFilter, Predicate, QueryBuilder,
    QueryFilterRegistry,
};
pub use repo::{
    CancellationToken, EntityPrimer, EntityProcessor, EntityReadService, EntityRepository,
    EntityRepositoryApi, EntryId, EntryState, ErasedRead, ErasedReadService, PrimerInterceptor,
    RepoError, RepoResult, SearchInput, TypedSearch,
};
pub use service::EntityManager;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
