//! Generational slot storage for scene nodes
//!
//! Nodes live in a flat `Vec` of slots. A freed slot joins an intrusive free
//! list and is reused by the next insertion, with its generation bumped so
//! that [`NodeId`]s handed out for the previous occupant stop resolving.
//!
//! | Operation | Time Complexity |
//! |-----------|-----------------|
//! | `insert`  | O(1) amortized  |
//! | `remove`  | O(1)            |
//! | `get`     | O(1)            |
//! | `iter`    | O(n)            |

use super::id::NodeId;

/// Internal slot state.
#[derive(Debug)]
enum Slot<T> {
    /// Slot holds a live value
    Occupied(T),
    /// Slot is free and points to the next free slot (or `NONE`)
    Vacant(u32),
}

#[derive(Debug)]
struct Entry<T> {
    generation: u32,
    slot: Slot<T>,
}

/// Generational arena addressed by [`NodeId`].
#[derive(Debug)]
pub(crate) struct Arena<T> {
    entries: Vec<Entry<T>>,
    /// Head of the free list
    free_head: u32,
    /// Number of occupied slots
    len: usize,
}

impl<T> Arena<T> {
    /// Sentinel marking the end of the free list.
    const NONE: u32 = u32::MAX;

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free_head: Self::NONE,
            len: 0,
        }
    }

    /// Store a value and return its handle.
    pub(crate) fn insert(&mut self, value: T) -> NodeId {
        self.len += 1;

        if self.free_head != Self::NONE {
            let index = self.free_head;
            let entry = &mut self.entries[index as usize];

            if let Slot::Vacant(next) = entry.slot {
                self.free_head = next;
            }
            entry.slot = Slot::Occupied(value);

            NodeId {
                index,
                generation: entry.generation,
            }
        } else {
            let index = u32::try_from(self.entries.len())
                .ok()
                .filter(|&i| i != Self::NONE)
                .expect("scene graph slot count overflowed u32");
            self.entries.push(Entry {
                generation: 0,
                slot: Slot::Occupied(value),
            });

            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Remove a value, returning it if the handle was live.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        let entry = self.entries.get_mut(id.index as usize)?;
        if entry.generation != id.generation || matches!(entry.slot, Slot::Vacant(_)) {
            return None;
        }

        let slot = std::mem::replace(&mut entry.slot, Slot::Vacant(self.free_head));
        entry.generation = entry.generation.wrapping_add(1);
        self.free_head = id.index;
        self.len -= 1;

        match slot {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    #[must_use]
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| match &entry.slot {
                Slot::Occupied(value) => Some(value),
                Slot::Vacant(_) => None,
            })
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| match &mut entry.slot {
                Slot::Occupied(value) => Some(value),
                Slot::Vacant(_) => None,
            })
    }

    #[must_use]
    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Iterate over live values with their handles.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match &entry.slot {
                Slot::Occupied(value) => Some((
                    NodeId {
                        index: index as u32,
                        generation: entry.generation,
                    },
                    value,
                )),
                Slot::Vacant(_) => None,
            })
    }
}
