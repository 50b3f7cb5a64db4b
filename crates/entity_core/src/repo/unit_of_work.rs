//! Staged entity changes awaiting one commit.

use std::collections::BTreeMap;

/// Handle of one staged entry inside a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Modify,
    Remove,
}

/// `Staged -> Committed`; only a successful commit moves an entry forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Staged(Operation),
    Committed(Operation),
}

impl EntryState {
    pub fn operation(self) -> Operation {
        match self {
            Self::Staged(operation) | Self::Committed(operation) => operation,
        }
    }

    pub fn is_staged(self) -> bool {
        matches!(self, Self::Staged(_))
    }
}

#[derive(Debug)]
struct Entry<E> {
    entity: E,
    state: EntryState,
}

/// Ordered set of entries; iteration follows staging order.
///
/// Committed entries stay readable only until the next entry is staged.
#[derive(Debug)]
pub struct UnitOfWork<E> {
    entries: BTreeMap<EntryId, Entry<E>>,
    next_id: u64,
}

impl<E> Default for UnitOfWork<E> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<E> UnitOfWork<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, entity: E, operation: Operation) -> EntryId {
        self.release_committed();
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                entity,
                state: EntryState::Staged(operation),
            },
        );
        id
    }

    pub fn entity(&self, id: EntryId) -> Option<&E> {
        self.entries.get(&id).map(|entry| &entry.entity)
    }

    pub fn state(&self, id: EntryId) -> Option<EntryState> {
        self.entries.get(&id).map(|entry| entry.state)
    }

    /// Number of tracked entries, staged and committed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.state.is_staged())
            .count()
    }

    pub fn has_pending(&self) -> bool {
        self.entries.values().any(|entry| entry.state.is_staged())
    }

    /// Staged entries in staging order.
    pub fn pending(&self) -> impl Iterator<Item = (EntryId, Operation, &E)> {
        self.entries.iter().filter_map(|(id, entry)| match entry.state {
            EntryState::Staged(operation) => Some((*id, operation, &entry.entity)),
            EntryState::Committed(_) => None,
        })
    }

    /// Mutable access to staged entries in staging order.
    pub fn pending_mut(&mut self) -> impl Iterator<Item = (EntryId, Operation, &mut E)> {
        self.entries
            .iter_mut()
            .filter_map(|(id, entry)| match entry.state {
                EntryState::Staged(operation) => Some((*id, operation, &mut entry.entity)),
                EntryState::Committed(_) => None,
            })
    }

    pub(crate) fn entity_mut(&mut self, id: EntryId) -> Option<&mut E> {
        self.entries.get_mut(&id).map(|entry| &mut entry.entity)
    }

    /// Moves every staged entry to `Committed`.
    pub fn mark_committed(&mut self) {
        for entry in self.entries.values_mut() {
            if let EntryState::Staged(operation) = entry.state {
                entry.state = EntryState::Committed(operation);
            }
        }
    }

    /// Drops staged entries; committed ones stay readable.
    pub fn discard_pending(&mut self) {
        self.entries.retain(|_, entry| !entry.state.is_staged());
    }

    /// Drops entries of earlier commits.
    pub fn release_committed(&mut self) {
        self.entries.retain(|_, entry| entry.state.is_staged());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
