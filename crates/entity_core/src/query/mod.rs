//! Query building: search criteria to parameterized SQL.
//!
//! # Responsibility
//! - Turn a sequence of search objects into an OR of AND-groups.
//! - Render ordering, paging and count queries for one entity table.
//!
//! # Invariants
//! - An empty search object sequence means no filtering, never no rows.
//! - The default id filter runs first, then capability-resolved global
//!   filters, then entity-specific filter builders.
//! - Global filters apply even when no search object is given.
//! - Ordering always ends with the primary key ascending.
//! - Paging is rendered last.

pub mod builder;
pub mod global;
pub mod predicate;

pub use builder::{EntityQuery, FilteredQueryBuilder, QueryBuilder, SelectQuery};
pub use global::{
    FilterTarget, GlobalQueryFilter, QueryFilterRegistry, QueryFilterRegistryBuilder,
};
pub use predicate::{FilterClause, FilterGroup, Predicate};
