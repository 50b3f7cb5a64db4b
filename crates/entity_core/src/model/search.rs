//! Transient search criteria: search objects, paging, sort keys, includes.

use crate::model::entity::EntityKey;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Filter criteria for one entity type.
///
/// Every search object carries the common id filters; entity specific fields
/// are read by registered filter builders.
pub trait SearchObject: Clone + Default + Debug + 'static {
    type Key: EntityKey;

    /// Exact key match.
    fn id(&self) -> Option<Self::Key>;

    fn set_id(&mut self, id: Option<Self::Key>);

    /// Key membership filter. Empty means no membership filter.
    fn ids(&self) -> &[Self::Key];

    /// Keys to leave out. Empty means nothing is excluded.
    fn exclude(&self) -> &[Self::Key];

    /// Search object matching exactly one key.
    fn with_id(id: Self::Key) -> Self {
        let mut so = Self::default();
        so.set_id(Some(id));
        so
    }
}

/// Common id criteria, usable directly or embedded in richer search objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria<K> {
    pub id: Option<K>,
    pub ids: Vec<K>,
    pub exclude: Vec<K>,
}

impl<K: EntityKey> SearchObject for SearchCriteria<K> {
    type Key = K;

    fn id(&self) -> Option<K> {
        self.id
    }

    fn set_id(&mut self, id: Option<K>) {
        self.id = id;
    }

    fn ids(&self) -> &[K] {
        &self.ids
    }

    fn exclude(&self) -> &[K] {
        &self.exclude
    }
}

/// Paging window applied after filtering and sorting.
///
/// `page` is 1-based; `0` is read as the first page. `skip` rows are skipped
/// before the page offset. A `page_size` of `0` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingInfo {
    pub page_size: u32,
    pub page: u32,
    pub skip: u32,
}

impl PagingInfo {
    pub fn new(page_size: u32, page: u32) -> Self {
        Self {
            page_size,
            page,
            skip: 0,
        }
    }

    /// First page of `page_size` rows.
    pub fn first(page_size: u32) -> Self {
        Self::new(page_size, 1)
    }

    /// Explicit skip/take window.
    pub fn skip_take(skip: u32, take: u32) -> Self {
        Self {
            page_size: take,
            page: 1,
            skip,
        }
    }

    pub fn limit(&self) -> Option<u32> {
        (self.page_size > 0).then_some(self.page_size)
    }

    pub fn offset(&self) -> u64 {
        let page_offset = u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size);
        u64::from(self.skip) + page_offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `ORDER BY` term: a column expression and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub expr: &'static str,
    pub direction: SortDirection,
}

impl OrderTerm {
    pub const fn asc(expr: &'static str) -> Self {
        Self {
            expr,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(expr: &'static str) -> Self {
        Self {
            expr,
            direction: SortDirection::Desc,
        }
    }
}

/// Entity-specific sort enumeration.
pub trait SortKey: Copy + Debug + 'static {
    fn order_terms(self) -> &'static [OrderTerm];
}

/// Sort enumeration for entities without custom orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSort {}

impl SortKey for NoSort {
    fn order_terms(self) -> &'static [OrderTerm] {
        match self {}
    }
}

/// Entity-specific flag set naming related collections to load eagerly.
pub trait IncludeSet: Copy + Default + Debug + 'static {
    fn is_empty(&self) -> bool;
}

/// Include set for entities without related collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoIncludes;

impl IncludeSet for NoIncludes {
    fn is_empty(&self) -> bool {
        true
    }
}
