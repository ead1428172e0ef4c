//! Typed entity storage with stable handles
//!
//! Entities are never inserted into or removed from the live set while a pass
//! iterates it:
//! - `spawn` goes to a pending buffer, merged by `flush`
//! - `Body::kill` only marks an entity dead, `sweep` compacts once per tick
//!
//! Handles are allocated monotonically and entries stay sorted by handle, so
//! iteration order is stable and lookups are a binary search.

use serde::{Deserialize, Serialize};

use super::state::Body;

/// Stable handle to an entity, unique within its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: EntityId,
    value: T,
}

/// Owning container for one entity kind
#[derive(Debug, Clone)]
pub struct Arena<T> {
    entries: Vec<Entry<T>>,
    pending: Vec<Entry<T>>,
    next_id: u32,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Body> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an entity; it joins the live set on the next `flush`
    pub fn spawn(&mut self, value: T) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.pending.push(Entry { id, value });
        id
    }

    /// Merge pending spawns into the live set, returns how many were merged
    pub fn flush(&mut self) -> usize {
        let merged = self.pending.len();
        // Pending handles are always newer than live ones, so order is kept
        self.entries.append(&mut self.pending);
        merged
    }

    /// Drop dead entities, returns how many were removed
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.value.is_alive());
        before - self.entries.len()
    }

    /// Remove everything, including pending spawns
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending.clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entries[i].value)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &mut self.entries[i].value)
    }

    /// Live-set entities (including ones killed this tick but not yet swept)
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|e| &mut e.value)
    }

    pub fn iter_with_ids(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entries.iter().map(|e| (e.id, &e.value))
    }

    /// Entities that are still alive
    pub fn alive(&self) -> impl Iterator<Item = &T> {
        self.iter().filter(|v| v.is_alive())
    }

    /// Number of entities in the live set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of spawns waiting for `flush`
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
