//! Composable query builder for one entity bundle.

use crate::model::entity::{Entity, EntityKey};
use crate::model::search::{OrderTerm, PagingInfo, SearchObject, SortKey};
use crate::model::traits::EntityTraits;
use crate::normalize::capability::Capability;
use crate::query::global::{FilterTarget, GlobalQueryFilter, QueryFilterRegistry};
use crate::query::predicate::{FilterClause, FilterGroup, Predicate};
use rusqlite::types::Value;
use std::sync::Arc;

/// Entity-specific filter contributing predicates for one search object.
///
/// Builders run after the default id filter, in registration order, and only
/// ever narrow the group they are handed.
pub trait FilteredQueryBuilder<T: EntityTraits>: Send + Sync {
    fn build(&self, so: &T::SearchObject, group: &mut FilterGroup);
}

/// Rendered SQL with positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// A select query plus the related collections to attach to its rows.
pub struct EntityQuery<T: EntityTraits> {
    pub select: SelectQuery,
    pub includes: T::Includes,
}

/// Builds filtered, ordered and paged queries for `T`.
pub struct QueryBuilder<T: EntityTraits> {
    global_filters: Vec<Arc<dyn GlobalQueryFilter>>,
    filters: Vec<Box<dyn FilteredQueryBuilder<T>>>,
}

impl<T: EntityTraits> Default for QueryBuilder<T> {
    fn default() -> Self {
        Self {
            global_filters: Vec::new(),
            filters: Vec::new(),
        }
    }
}

impl<T: EntityTraits> QueryBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an additional filter builder.
    pub fn with_filter(mut self, filter: impl FilteredQueryBuilder<T> + 'static) -> Self {
        self.add_filter(filter);
        self
    }

    pub fn add_filter(&mut self, filter: impl FilteredQueryBuilder<T> + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Adds the global filters `registry` resolves for `capability`, the
    /// capability of this bundle's entity.
    pub fn with_global_filters<C: Capability>(
        mut self,
        registry: &QueryFilterRegistry<C>,
        capability: C,
    ) -> Self {
        self.global_filters.extend(registry.resolve(capability));
        self
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn global_filter_count(&self) -> usize {
        self.global_filters.len()
    }

    /// Conjunctive group for one search object: id filters first, then global
    /// filters, then every registered filter builder.
    pub fn group(&self, so: &T::SearchObject) -> FilterGroup {
        let mut group = FilterGroup::new();
        apply_default_filter(so, T::Entity::KEY_COLUMN, &mut group);
        self.apply_global_filters(&mut group);
        for filter in &self.filters {
            filter.build(so, &mut group);
        }
        group
    }

    /// Union of the per-search-object groups.
    ///
    /// Without search objects only the global filters remain.
    pub fn filter(&self, search_objects: &[T::SearchObject]) -> FilterClause {
        if search_objects.is_empty() && !self.global_filters.is_empty() {
            let mut group = FilterGroup::new();
            self.apply_global_filters(&mut group);
            return FilterClause::new(vec![group]);
        }
        FilterClause::new(search_objects.iter().map(|so| self.group(so)).collect())
    }

    fn apply_global_filters(&self, group: &mut FilterGroup) {
        let target = FilterTarget {
            table: T::Entity::TABLE,
            key_column: T::Entity::KEY_COLUMN,
        };
        for filter in &self.global_filters {
            filter.build(&target, group);
        }
    }

    /// Full select: filter, order, includes and paging.
    pub fn query(
        &self,
        search_objects: &[T::SearchObject],
        sort_by: &[T::SortBy],
        includes: Option<T::Includes>,
        paging: Option<&PagingInfo>,
    ) -> EntityQuery<T> {
        let mut sql = format!(
            "SELECT {} FROM {}",
            select_columns::<T::Entity>(),
            T::Entity::TABLE
        );
        let mut params = Vec::new();

        if let Some((where_sql, where_params)) = self.filter(search_objects).render() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
            params.extend(where_params);
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(&order_by::<T>(sort_by));

        if let Some(paging) = paging {
            push_paging(&mut sql, &mut params, paging);
        }

        EntityQuery {
            select: SelectQuery { sql, params },
            includes: includes.unwrap_or_default(),
        }
    }

    /// Cardinality query sharing the filter semantics of [`Self::query`].
    pub fn count_query(&self, search_objects: &[T::SearchObject]) -> SelectQuery {
        let mut sql = format!("SELECT COUNT(*) FROM {}", T::Entity::TABLE);
        let mut params = Vec::new();
        if let Some((where_sql, where_params)) = self.filter(search_objects).render() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
            params.extend(where_params);
        }
        SelectQuery { sql, params }
    }
}

/// Applies `id`, `ids` and `exclude` from any search object.
pub fn apply_default_filter<S: SearchObject>(so: &S, key_column: &str, group: &mut FilterGroup) {
    if let Some(id) = so.id() {
        group.and(Predicate::eq(key_column, id.to_sql_value()));
    }
    group.and_some(Predicate::in_list(
        key_column,
        so.ids().iter().map(EntityKey::to_sql_value),
    ));
    group.and_some(Predicate::not_in_list(
        key_column,
        so.exclude().iter().map(EntityKey::to_sql_value),
    ));
}

pub(crate) fn select_columns<E: Entity>() -> String {
    std::iter::once(E::KEY_COLUMN)
        .chain(E::COLUMNS.iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

fn order_by<T: EntityTraits>(sort_by: &[T::SortBy]) -> String {
    let key_column = T::Entity::KEY_COLUMN;
    let terms: Vec<OrderTerm> = sort_by
        .iter()
        .flat_map(|key| key.order_terms().iter().copied())
        .collect();

    let mut rendered: Vec<String> = terms
        .iter()
        .map(|term| format!("{} {}", term.expr, term.direction.as_sql()))
        .collect();
    // Key order breaks ties so pages stay stable between calls.
    if !terms.iter().any(|term| term.expr == key_column) {
        rendered.push(format!("{key_column} ASC"));
    }
    rendered.join(", ")
}

fn push_paging(sql: &mut String, params: &mut Vec<Value>, paging: &PagingInfo) {
    let offset = paging.offset();
    match paging.limit() {
        Some(limit) => {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(i64::from(limit)));
            if offset > 0 {
                sql.push_str(" OFFSET ?");
                params.push(Value::Integer(offset_value(offset)));
            }
        }
        None if offset > 0 => {
            sql.push_str(" LIMIT -1 OFFSET ?");
            params.push(Value::Integer(offset_value(offset)));
        }
        None => {}
    }
}

fn offset_value(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}
