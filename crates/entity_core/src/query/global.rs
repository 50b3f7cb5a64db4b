//! Query filters registered once per capability and shared by every entity
//! bundle carrying it.

use crate::normalize::capability::{matching_indexes, resolution_table, Capability};
use crate::query::predicate::FilterGroup;
use std::collections::HashMap;
use std::sync::Arc;

/// Table a global filter is rendered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTarget {
    pub table: &'static str,
    pub key_column: &'static str,
}

/// Filter applying to every entity whose capability closure contains the
/// tag it was registered for.
///
/// Global filters run after the default id filter and before
/// entity-specific builders; they only ever narrow the group.
pub trait GlobalQueryFilter: Send + Sync {
    fn build(&self, target: &FilterTarget, group: &mut FilterGroup);
}

/// Collects global filter registrations before the registry is published.
pub struct QueryFilterRegistryBuilder<C> {
    registrations: Vec<(C, Arc<dyn GlobalQueryFilter>)>,
}

impl<C: Capability> Default for QueryFilterRegistryBuilder<C> {
    fn default() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }
}

impl<C: Capability> QueryFilterRegistryBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, capability: C, filter: impl GlobalQueryFilter + 'static) -> Self {
        self.registrations.push((capability, Arc::new(filter)));
        self
    }

    pub fn build(self) -> QueryFilterRegistry<C> {
        let tags: Vec<C> = self.registrations.iter().map(|(tag, _)| *tag).collect();
        QueryFilterRegistry {
            table: resolution_table(&tags),
            tags,
            filters: self
                .registrations
                .into_iter()
                .map(|(_, filter)| filter)
                .collect(),
        }
    }
}

/// Immutable capability-keyed filter registry.
pub struct QueryFilterRegistry<C> {
    tags: Vec<C>,
    filters: Vec<Arc<dyn GlobalQueryFilter>>,
    table: HashMap<C, Vec<usize>>,
}

impl<C: Capability> QueryFilterRegistry<C> {
    pub fn builder() -> QueryFilterRegistryBuilder<C> {
        QueryFilterRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filters applicable to `capability`, in registration order.
    pub fn resolve(&self, capability: C) -> Vec<Arc<dyn GlobalQueryFilter>> {
        let indexes = match self.table.get(&capability) {
            Some(indexes) => indexes.clone(),
            None => matching_indexes(&self.tags, capability),
        };
        indexes
            .into_iter()
            .map(|index| Arc::clone(&self.filters[index]))
            .collect()
    }
}
