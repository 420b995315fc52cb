// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DeviceId, PressCounts, PressState};
use crate::{ArenaId, ContractViolation};

/// Handle to a [`Seat`] owned by an [`OwnershipGraph`]. Goes stale when the seat is
/// destroyed.
///
/// [`OwnershipGraph`]: crate::OwnershipGraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatId(pub(crate) ArenaId);

/// A logical group of devices that share press counts, eg: one user's keyboard and
/// mouse.
#[derive(Debug)]
pub struct Seat {
    physical_name: String,
    logical_name: String,
    pub(crate) refcount: u32,
    pub(crate) devices: Vec<DeviceId>,
    key_counts: PressCounts,
    button_counts: PressCounts,
}

impl Seat {
    pub(crate) fn new(physical_name: &str, logical_name: &str) -> Self {
        Self {
            physical_name: physical_name.to_owned(),
            logical_name: logical_name.to_owned(),
            refcount: 1,
            devices: Vec::new(),
            key_counts: PressCounts::default(),
            button_counts: PressCounts::default(),
        }
    }

    #[must_use]
    pub fn physical_name(&self) -> &str { &self.physical_name }

    #[must_use]
    pub fn logical_name(&self) -> &str { &self.logical_name }

    #[must_use]
    pub fn refcount(&self) -> u32 { self.refcount }

    /// Member devices, in the order they were added.
    #[must_use]
    pub fn devices(&self) -> &[DeviceId] { &self.devices }

    #[must_use]
    pub fn key_count(&self, key: u32) -> Option<u32> { self.key_counts.count(key) }

    #[must_use]
    pub fn button_count(&self, button: u32) -> Option<u32> {
        self.button_counts.count(button)
    }

    pub(crate) fn update_key_count(
        &mut self,
        key: u32,
        state: PressState,
    ) -> Result<u32, ContractViolation> {
        self.key_counts.update(key, state)
    }

    pub(crate) fn update_button_count(
        &mut self,
        button: u32,
        state: PressState,
    ) -> Result<u32, ContractViolation> {
        self.button_counts.update(button, state)
    }
}
