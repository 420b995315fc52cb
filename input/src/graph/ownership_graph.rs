// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The seat → device hierarchy and its reference counting rules.
//!
//! ```text
//! OwnershipGraph
//!   ├── seats:   Arena<Seat>    seat.devices lists its members (strong)
//!   └── devices: Arena<Device>  device.seat points back (holds 1 seat ref)
//! ```
//!
//! | Entity | Starts at | Destroyed when count hits 0                            |
//! | :----- | :-------- | :----------------------------------------------------- |
//! | Seat   | 1         | removed from the arena                                 |
//! | Device | 1         | unlinked from its seat, then the seat is unref'd       |
//!
//! Destruction always runs bottom-up, device before seat. A seat cannot reach zero
//! while any of its devices is alive, since each device holds one of its references.

use super::{Device, DeviceCapabilities, DeviceId, Seat, SeatId};
use crate::{Arena, ContractViolation};

#[derive(Debug, Default)]
pub struct OwnershipGraph {
    seats: Arena<Seat>,
    devices: Arena<Device>,
}

impl OwnershipGraph {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// New seat with a reference count of 1, owned by the caller.
    pub fn create_seat(&mut self, physical_name: &str, logical_name: &str) -> SeatId {
        SeatId(self.seats.insert(Seat::new(physical_name, logical_name)))
    }

    #[must_use]
    pub fn find_seat(&self, physical_name: &str, logical_name: &str) -> Option<SeatId> {
        self.seats
            .iter()
            .find(|(_, seat)| {
                seat.physical_name() == physical_name && seat.logical_name() == logical_name
            })
            .map(|(id, _)| SeatId(id))
    }

    /// Refs a matching seat, or creates one. Either way the caller owns one reference.
    pub fn get_or_create_seat(&mut self, physical_name: &str, logical_name: &str) -> SeatId {
        if let Some(id) = self.find_seat(physical_name, logical_name)
            && let Some(seat) = self.seats.get_mut(id.0)
        {
            seat.refcount += 1;
            return id;
        }
        self.create_seat(physical_name, logical_name)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleSeat`] if the seat was destroyed.
    pub fn seat(&self, id: SeatId) -> Result<&Seat, ContractViolation> {
        self.seats.get(id.0).ok_or(ContractViolation::StaleSeat)
    }

    pub(crate) fn seat_mut(&mut self, id: SeatId) -> Result<&mut Seat, ContractViolation> {
        self.seats.get_mut(id.0).ok_or(ContractViolation::StaleSeat)
    }

    pub fn seats(&self) -> impl Iterator<Item = (SeatId, &Seat)> {
        self.seats.iter().map(|(id, seat)| (SeatId(id), seat))
    }

    #[must_use]
    pub fn seat_count(&self) -> usize { self.seats.len() }

    /// # Errors
    ///
    /// [`ContractViolation::StaleSeat`] if the seat was destroyed.
    pub fn seat_ref(&mut self, id: SeatId) -> Result<(), ContractViolation> {
        self.seat_mut(id)?.refcount += 1;
        Ok(())
    }

    /// Drops one reference. Returns the seat if this was the last one.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleSeat`] if the seat was already destroyed.
    pub fn seat_unref(&mut self, id: SeatId) -> Result<Option<Seat>, ContractViolation> {
        let seat = self.seat_mut(id)?;
        seat.refcount -= 1;
        if seat.refcount > 0 {
            return Ok(None);
        }
        tracing::debug!(message = "seat destroyed", seat = %seat.physical_name());
        Ok(self.seats.remove(id.0))
    }

    /// New device with a reference count of 1, owned by the caller. The device takes
    /// its own reference on `seat` and is appended to the seat's device list.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleSeat`] if the seat was destroyed.
    pub fn create_device(
        &mut self,
        seat: SeatId,
        name: &str,
        capabilities: DeviceCapabilities,
    ) -> Result<DeviceId, ContractViolation> {
        self.seat_ref(seat)?;
        let id = DeviceId(self.devices.insert(Device::new(name, seat, capabilities)));
        self.seat_mut(seat)?.devices.push(id);
        Ok(id)
    }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    pub fn device(&self, id: DeviceId) -> Result<&Device, ContractViolation> {
        self.devices.get(id.0).ok_or(ContractViolation::StaleDevice)
    }

    pub(crate) fn device_mut(
        &mut self,
        id: DeviceId,
    ) -> Result<&mut Device, ContractViolation> {
        self.devices.get_mut(id.0).ok_or(ContractViolation::StaleDevice)
    }

    pub fn devices(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices.iter().map(|(id, device)| (DeviceId(id), device))
    }

    #[must_use]
    pub fn device_count(&self) -> usize { self.devices.len() }

    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was destroyed.
    pub fn device_ref(&mut self, id: DeviceId) -> Result<(), ContractViolation> {
        self.device_mut(id)?.refcount += 1;
        Ok(())
    }

    /// Drops one reference. On the last one the device is unlinked from its seat, the
    /// seat is unref'd, and the device is handed back so the caller can release its
    /// descriptor and source.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was already destroyed.
    pub fn device_unref(&mut self, id: DeviceId) -> Result<Option<Device>, ContractViolation> {
        let device = self.device_mut(id)?;
        device.refcount -= 1;
        if device.refcount > 0 {
            return Ok(None);
        }
        Ok(self.destroy_device(id))
    }

    /// Destroys every device regardless of its count, then every seat. Used by the
    /// context teardown, after all events are gone.
    pub(crate) fn tear_down(&mut self) -> Vec<Device> {
        let destroyed = self
            .devices
            .ids()
            .into_iter()
            .filter_map(|id| self.destroy_device(DeviceId(id)))
            .collect();
        for id in self.seats.ids() {
            self.seats.remove(id);
        }
        destroyed
    }

    fn destroy_device(&mut self, id: DeviceId) -> Option<Device> {
        let device = self.devices.remove(id.0)?;
        tracing::debug!(message = "device destroyed", device = %device.name());
        if let Ok(seat) = self.seat_mut(device.seat()) {
            seat.devices.retain(|it| *it != id);
        }
        // The seat may already be gone during teardown.
        let _unused = self.seat_unref(device.seat());
        Some(device)
    }
}
