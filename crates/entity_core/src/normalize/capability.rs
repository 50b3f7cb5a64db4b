//! Capability tags standing in for interfaces and base types.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A closed set of capability tags.
///
/// A concrete entity type has one tag; that tag implies the tags of every
/// interface it implements and every base type it derives from.
pub trait Capability: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Tags directly implied by this one.
    fn implied(self) -> &'static [Self];

    /// Every tag of the set.
    fn all() -> &'static [Self];
}

/// Exposes the concrete capability tag of an entity instance.
pub trait HasCapability<C: Capability> {
    fn capability(&self) -> C;
}

/// The tag itself followed by every transitively implied tag, each once.
///
/// Breadth-first, so nearer capabilities come first.
pub fn capability_closure<C: Capability>(capability: C) -> Vec<C> {
    let mut resolved = vec![capability];
    let mut cursor = 0;
    while cursor < resolved.len() {
        for implied in resolved[cursor].implied() {
            if !resolved.contains(implied) {
                resolved.push(*implied);
            }
        }
        cursor += 1;
    }
    resolved
}

/// Indexes into `tags` of every registration applicable to `capability`,
/// in registration order.
pub fn matching_indexes<C: Capability>(tags: &[C], capability: C) -> Vec<usize> {
    let closure = capability_closure(capability);
    tags.iter()
        .enumerate()
        .filter(|(_, tag)| closure.contains(*tag))
        .map(|(index, _)| index)
        .collect()
}

/// [`matching_indexes`] precomputed for every tag of `C`.
pub fn resolution_table<C: Capability>(tags: &[C]) -> HashMap<C, Vec<usize>> {
    C::all()
        .iter()
        .map(|capability| (*capability, matching_indexes(tags, *capability)))
        .collect()
}
