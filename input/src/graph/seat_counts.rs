// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{KEY_CNT, KEY_MAX};
use crate::ContractViolation;

/// Press/release transition fed to [`PressCounts::update()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressState {
    Released,
    Pressed,
}

/// How many devices in a seat currently report each code as pressed. This is what lets
/// a desktop know when *all* keyboards have let go of a modifier.
///
/// Releases floor at zero: a device may be added while a key is already held, or a
/// press may have been lost, and the count must never wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressCounts {
    counts: Box<[u32]>,
}

impl Default for PressCounts {
    fn default() -> Self {
        Self {
            counts: vec![0; KEY_CNT].into_boxed_slice(),
        }
    }
}

impl PressCounts {
    /// Applies one transition and returns the new count for `code`.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::CodeOutOfRange`] if `code > KEY_MAX`. The table is
    /// unchanged.
    pub fn update(&mut self, code: u32, state: PressState) -> Result<u32, ContractViolation> {
        let slot = usize::try_from(code)
            .ok()
            .and_then(|index| self.counts.get_mut(index))
            .ok_or(ContractViolation::CodeOutOfRange { code, max: KEY_MAX })?;

        match state {
            PressState::Pressed => *slot = slot.saturating_add(1),
            PressState::Released => *slot = slot.saturating_sub(1),
        }
        Ok(*slot)
    }

    /// Current count, `None` when `code` is out of range.
    #[must_use]
    pub fn count(&self, code: u32) -> Option<u32> {
        usize::try_from(code)
            .ok()
            .and_then(|index| self.counts.get(index))
            .copied()
    }
}
