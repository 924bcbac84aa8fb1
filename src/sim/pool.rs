//! Per-variant entity storage with removal-safe iteration
//!
//! Entities are addressed by stable [`EntityId`] handles. Removal only marks
//! a slot; the slot disappears on [`EntityPool::flush`] at the end of a tick.
//! Walking a point-in-time [`EntityPool::ids`] snapshot while removing
//! therefore never skips or revisits a member, and a removed entity is
//! invisible to every later lookup in the same tick.

/// Stable handle into an [`EntityPool`]
pub type EntityId = u32;

#[derive(Debug, Clone)]
struct Slot<T> {
    id: EntityId,
    value: T,
    removed: bool,
}

/// Insertion-ordered arena of one entity variant
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    // Sorted by id: ids are handed out monotonically and flush keeps order
    slots: Vec<Slot<T>>,
    next_id: EntityId,
    pending: usize,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityPool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
            pending: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            value,
            removed: false,
        });
        id
    }

    /// Snapshot of live handles at this moment
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        let idx = self.slots.binary_search_by_key(&id, |s| s.id).ok()?;
        (!self.slots[idx].removed).then_some(idx)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.index_of(id).map(|i| &self.slots[i].value)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.index_of(id).map(|i| &mut self.slots[i].value)
    }

    /// Mark one entity for removal. Returns false if it was already gone.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.slots[i].removed = true;
                self.pending += 1;
                true
            }
            None => false,
        }
    }

    /// Drop every slot marked for removal
    pub fn flush(&mut self) {
        if self.pending > 0 {
            self.slots.retain(|s| !s.removed);
            self.pending = 0;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .filter(|s| !s.removed)
            .map(|s| (s.id, &s.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .filter(|s| !s.removed)
            .map(|s| (s.id, &mut s.value))
    }

    /// Live entity count
    pub fn len(&self) -> usize {
        self.slots.len() - self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entity. Ids are never reused, so stale handles stay dead.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.pending = 0;
    }
}
