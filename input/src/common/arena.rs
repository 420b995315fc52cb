// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Slot storage with generation-checked handles.
//!
//! Seats, devices, and multiplexer sources all live in an [`Arena`]. Handing out
//! [`ArenaId`]s instead of pointers lets an entity refer to another (device → seat,
//! event → device) without shared ownership, and a handle that outlives its entity is
//! detected by the generation check instead of aliasing whatever reused the slot.

use std::fmt::Debug;

/// Index plus generation. Stale once the slot is freed, even if it is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId {
    pub index: usize,
    pub generation: u32,
}

#[derive(Debug)]
struct ArenaSlot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<ArenaSlot<T>>,
    free_list: Vec<usize>,
    count: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Arena<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Stores `value`, reusing the most recently freed slot if there is one.
    pub fn insert(&mut self, value: T) -> ArenaId {
        self.count += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            return ArenaId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(ArenaSlot {
            generation: 0,
            value: Some(value),
        });
        ArenaId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Frees the slot and bumps its generation so outstanding ids go stale.
    pub fn remove(&mut self, id: ArenaId) -> Option<T> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.count -= 1;
        Some(value)
    }

    #[must_use]
    pub fn get(&self, id: ArenaId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: ArenaId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Looks up by raw index, for callers that only kept the index (eg: a [`mio::Token`]).
    pub fn get_mut_by_index(&mut self, index: usize) -> Option<(ArenaId, &mut T)> {
        let slot = self.slots.get_mut(index)?;
        let generation = slot.generation;
        slot.value.as_mut().map(|value| (ArenaId { index, generation }, value))
    }

    #[must_use]
    pub fn contains(&self, id: ArenaId) -> bool { self.get(id).is_some() }

    #[must_use]
    pub fn len(&self) -> usize { self.count }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.count == 0 }

    /// Ids of all live entries, in slot order.
    #[must_use]
    pub fn ids(&self) -> Vec<ArenaId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArenaId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    ArenaId {
                        index,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }
}
