//! Per-entity type bundle consumed by query builders and repositories.

use crate::model::entity::Entity;
use crate::model::search::{IncludeSet, SearchObject, SortKey};
use rusqlite::Connection;

/// Key type of an [`EntityTraits`] bundle.
pub type KeyOf<T> = <<T as EntityTraits>::Entity as Entity>::Key;

/// Groups the entity, search object, sort enum and include set of one
/// entity type.
///
/// Repositories and query builders are generic over a single bundle instead
/// of over each type separately.
pub trait EntityTraits: 'static {
    type Entity: Entity;
    type SearchObject: SearchObject<Key = <Self::Entity as Entity>::Key>;
    type SortBy: SortKey;
    type Includes: IncludeSet;

    /// Loads the related collections named by `includes` onto `items`.
    ///
    /// Only called with a non-empty include set.
    fn attach_includes(
        _conn: &Connection,
        _items: &mut [Self::Entity],
        _includes: Self::Includes,
    ) -> rusqlite::Result<()> {
        Ok(())
    }
}
