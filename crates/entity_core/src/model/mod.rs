//! Entity and search model shared by query building and repositories.
//!
//! # Responsibility
//! - Define the keyed entity contract and its SQL row mapping.
//! - Define transient search criteria: search objects, paging, sort keys and
//!   include sets.
//! - Bundle the per-entity type parameters into one [`EntityTraits`] type.
//!
//! # Invariants
//! - A key equal to `Default::default()` marks an entity as new.
//! - Search criteria are value objects built per call and never retained.

pub mod entity;
pub mod search;
pub mod traits;

pub use entity::{key_from_row, Entity, EntityKey};
pub use search::{
    IncludeSet, NoIncludes, NoSort, OrderTerm, PagingInfo, SearchCriteria, SearchObject,
    SortDirection, SortKey,
};
pub use traits::{EntityTraits, KeyOf};
