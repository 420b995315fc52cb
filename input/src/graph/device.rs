// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DeviceCapabilities, DeviceCapability, SeatId};
use crate::{ArenaId, SourceId};
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};

/// Handle to a [`Device`]. Events carry one of these, and hold a reference on the
/// device for as long as they are alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub(crate) ArenaId);

/// One physical input device.
///
/// A device opened by path owns its descriptor and the multiplexer registration that
/// polls it. Devices made with [`OwnershipGraph::create_device()`] have neither.
///
/// [`OwnershipGraph::create_device()`]: crate::OwnershipGraph::create_device
#[derive(Debug)]
pub struct Device {
    name: String,
    seat: SeatId,
    capabilities: DeviceCapabilities,
    pub(crate) refcount: u32,
    pub(crate) fd: Option<OwnedFd>,
    pub(crate) source: Option<SourceId>,
}

impl Device {
    pub(crate) fn new(name: &str, seat: SeatId, capabilities: DeviceCapabilities) -> Self {
        Self {
            name: name.to_owned(),
            seat,
            capabilities,
            refcount: 1,
            fd: None,
            source: None,
        }
    }

    /// The device path for path devices.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[must_use]
    pub fn seat(&self) -> SeatId { self.seat }

    #[must_use]
    pub fn capabilities(&self) -> DeviceCapabilities { self.capabilities }

    #[must_use]
    pub fn has_capability(&self, capability: DeviceCapability) -> bool {
        self.capabilities.has(capability)
    }

    #[must_use]
    pub fn refcount(&self) -> u32 { self.refcount }

    /// `None` once the device has been removed, or if it never had a descriptor.
    #[must_use]
    pub fn fd(&self) -> Option<BorrowedFd<'_>> { self.fd.as_ref().map(AsFd::as_fd) }

    #[must_use]
    pub fn source(&self) -> Option<SourceId> { self.source }
}
