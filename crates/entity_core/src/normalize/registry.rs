//! Normalizer registrations and capability resolution.

use crate::normalize::capability::{matching_indexes, resolution_table, Capability, HasCapability};
use crate::normalize::context::NormalizeContext;
use crate::normalize::normalizer::EntityNormalizer;
use crate::normalize::NormalizeResult;
use log::debug;
use std::collections::HashMap;

type NormalizerFactory<T> =
    Box<dyn Fn(&NormalizeContext<'_>) -> Box<dyn EntityNormalizer<T>> + Send + Sync>;

struct Registration<C, T: ?Sized> {
    capability: C,
    factory: NormalizerFactory<T>,
}

/// Collects registrations before the registry is published.
pub struct NormalizerRegistryBuilder<C, T: ?Sized> {
    registrations: Vec<Registration<C, T>>,
}

impl<C: Capability, T: ?Sized> Default for NormalizerRegistryBuilder<C, T> {
    fn default() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }
}

impl<C: Capability, T: ?Sized + 'static> NormalizerRegistryBuilder<C, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for entities carrying `capability`.
    ///
    /// Registrations never replace each other, even for the same capability.
    pub fn register<F>(mut self, capability: C, factory: F) -> Self
    where
        F: Fn(&NormalizeContext<'_>) -> Box<dyn EntityNormalizer<T>> + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            capability,
            factory: Box::new(factory),
        });
        self
    }

    /// Registers a normalizer that needs no collaborators; each resolution
    /// gets a fresh clone.
    pub fn register_instance<N>(self, capability: C, normalizer: N) -> Self
    where
        N: EntityNormalizer<T> + Clone + 'static,
    {
        self.register(capability, move |_| Box::new(normalizer.clone()))
    }

    /// Publishes the registry and precomputes the per-capability table.
    pub fn build(self) -> NormalizerRegistry<C, T> {
        let table = resolution_table(&tags(&self.registrations));
        NormalizerRegistry {
            registrations: self.registrations,
            table,
        }
    }
}

/// Immutable normalizer registry, shared across units of work.
pub struct NormalizerRegistry<C, T: ?Sized> {
    registrations: Vec<Registration<C, T>>,
    table: HashMap<C, Vec<usize>>,
}

impl<C: Capability, T: ?Sized + 'static> NormalizerRegistry<C, T> {
    pub fn builder() -> NormalizerRegistryBuilder<C, T> {
        NormalizerRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Instantiates every normalizer applicable to `capability`.
    pub fn find_for(
        &self,
        ctx: &NormalizeContext<'_>,
        capability: C,
    ) -> Vec<Box<dyn EntityNormalizer<T>>> {
        let indexes = match self.table.get(&capability) {
            Some(indexes) => indexes.clone(),
            None => matching_indexes(&tags(&self.registrations), capability),
        };
        let mut normalizers: Vec<Box<dyn EntityNormalizer<T>>> = indexes
            .into_iter()
            .map(|index| (self.registrations[index].factory)(ctx))
            .collect();

        if normalizers.iter().any(|normalizer| normalizer.is_exclusive()) {
            normalizers.retain(|normalizer| normalizer.is_exclusive());
        }
        normalizers
    }

    /// Instantiates every normalizer applicable to `item`.
    pub fn find_all(
        &self,
        ctx: &NormalizeContext<'_>,
        item: &T,
    ) -> Vec<Box<dyn EntityNormalizer<T>>>
    where
        T: HasCapability<C>,
    {
        self.find_for(ctx, item.capability())
    }

    /// Runs every applicable normalizer on one entity.
    pub fn normalize_one(&self, ctx: &NormalizeContext<'_>, item: &mut T) -> NormalizeResult<usize>
    where
        T: HasCapability<C>,
    {
        let normalizers = self.find_all(ctx, item);
        for normalizer in &normalizers {
            normalizer.normalize(ctx, item)?;
        }
        Ok(normalizers.len())
    }

    /// Runs the pipeline on a batch of entities; returns normalizer runs.
    pub fn apply<'a, I>(&self, ctx: &NormalizeContext<'_>, items: I) -> NormalizeResult<usize>
    where
        I: IntoIterator<Item = &'a mut T>,
        T: HasCapability<C> + 'a,
    {
        let mut entities = 0;
        let mut runs = 0;
        for item in items {
            runs += self.normalize_one(ctx, item)?;
            entities += 1;
        }
        debug!("event=normalize_apply module=normalize status=ok entities={entities} runs={runs}");
        Ok(runs)
    }
}

fn tags<C: Capability, T: ?Sized>(registrations: &[Registration<C, T>]) -> Vec<C> {
    registrations
        .iter()
        .map(|registration| registration.capability)
        .collect()
}
