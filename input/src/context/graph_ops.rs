// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Seat and device management on [`Context`]. These wrap [`OwnershipGraph`] and add
//! the one thing the graph can't do itself: release a destroyed device's descriptor
//! and source.

use super::Context;
use crate::{Device, DeviceCapabilities, DeviceId, InputResult, OwnershipGraph, Seat, SeatId};

impl Context {
    #[must_use]
    pub fn graph(&self) -> &OwnershipGraph { &self.graph }

    /// New seat with one reference, owned by the caller. Names are copied.
    pub fn create_seat(&mut self, physical_name: &str, logical_name: &str) -> SeatId {
        self.graph.create_seat(physical_name, logical_name)
    }

    #[must_use]
    pub fn find_seat(&self, physical_name: &str, logical_name: &str) -> Option<SeatId> {
        self.graph.find_seat(physical_name, logical_name)
    }

    pub fn get_or_create_seat(&mut self, physical_name: &str, logical_name: &str) -> SeatId {
        self.graph.get_or_create_seat(physical_name, logical_name)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleSeat`] if the seat was destroyed.
    ///
    /// [`ContractViolation::StaleSeat`]: crate::ContractViolation::StaleSeat
    pub fn seat(&self, seat: SeatId) -> InputResult<&Seat> { Ok(self.graph.seat(seat)?) }

    /// # Errors
    ///
    /// [`ContractViolation::StaleSeat`] if the seat was destroyed.
    ///
    /// [`ContractViolation::StaleSeat`]: crate::ContractViolation::StaleSeat
    pub fn seat_ref(&mut self, seat: SeatId) -> InputResult<()> {
        Ok(self.graph.seat_ref(seat)?)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleSeat`] if the seat was already destroyed.
    ///
    /// [`ContractViolation::StaleSeat`]: crate::ContractViolation::StaleSeat
    pub fn seat_unref(&mut self, seat: SeatId) -> InputResult<()> {
        self.graph.seat_unref(seat)?;
        Ok(())
    }

    /// A device without a descriptor, for backends that feed several logical devices
    /// from one descriptor they poll themselves.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleSeat`] if the seat was destroyed.
    ///
    /// [`ContractViolation::StaleSeat`]: crate::ContractViolation::StaleSeat
    pub fn create_device(
        &mut self,
        seat: SeatId,
        name: &str,
        capabilities: DeviceCapabilities,
    ) -> InputResult<DeviceId> {
        Ok(self.graph.create_device(seat, name, capabilities)?)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn device(&self, device: DeviceId) -> InputResult<&Device> {
        Ok(self.graph.device(device)?)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn device_ref(&mut self, device: DeviceId) -> InputResult<()> {
        Ok(self.graph.device_ref(device)?)
    }

    /// On the last reference the device leaves its seat, and any descriptor or source
    /// it still holds is released.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was already destroyed.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn device_unref(&mut self, device: DeviceId) -> InputResult<()> {
        if let Some(destroyed) = self.graph.device_unref(device)? {
            self.release_device(destroyed);
        }
        Ok(())
    }
}
