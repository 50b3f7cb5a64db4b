//! Generic read/write repository over one SQLite table per entity.
//!
//! # Responsibility
//! - Expose the read contract (`details`, `list`, `count`) built on the
//!   query builder, plus an object-typed facade for cross-entity callers.
//! - Stage writes in a unit of work and commit them atomically.
//! - Run save interceptors (normalizers, primers) on staged entities before
//!   commit, and entity processors on rows after every read.
//!
//! # Invariants
//! - `details` never queries for a zero key.
//! - `modify` of a key without a stored row is a silent no-op.
//! - Nothing reaches storage before `save_changes`; a failed or cancelled
//!   commit writes nothing and leaves entries staged.
//! - Committed entries are released when the next change is staged or the
//!   next `save_changes` starts.
//! - Errors propagate unchanged; the repository neither retries nor logs them.

pub mod cancel;
pub mod contract;
pub mod entity_repo;
pub mod erased;
pub mod error;
pub mod hooks;
pub mod interceptor;
pub mod primer;
pub mod processor;
pub mod unit_of_work;

pub use cancel::CancellationToken;
pub use contract::{EntityReadService, EntityRepositoryApi};
pub use entity_repo::EntityRepository;
pub use erased::{
    convert_search_object, ErasedRead, ErasedReadService, SearchInput, TypedSearch,
};
pub use error::{RepoError, RepoResult};
pub use hooks::{NoHooks, RepositoryHooks};
pub use interceptor::SaveInterceptor;
pub use primer::{EntityPrimer, PrimerInterceptor};
pub use processor::EntityProcessor;
pub use unit_of_work::{EntryId, EntryState, Operation, UnitOfWork};
