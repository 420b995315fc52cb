// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{Context, DEVICE_OPEN_FLAGS};
use crate::{DeviceCapabilities, DeviceId, DeviceNotifyEvent, EventKind, InputError,
            InputResult, SourceId};
use std::{os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd},
          path::Path};

/// Path devices all join this one seat.
pub const DEFAULT_SEAT_PHYSICAL_NAME: &str = "seat0";
pub const DEFAULT_SEAT_LOGICAL_NAME: &str = "default";

/// Current wall clock time in microseconds, for events that don't come from a device
/// record.
fn now_usec() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_micros()).unwrap_or_default()
}

impl Context {
    /// Opens `path` through the [`RestrictedIo`], adds it as a device on the default
    /// seat, and polls it. Whenever the descriptor is readable `backend` is called
    /// with the context, the device, and the descriptor; it is expected to read what
    /// it can and call the notify functions. A [`EventType::DeviceAdded`] event is
    /// queued.
    ///
    /// The returned handle carries one reference, owned by the caller and released by
    /// [`Self::path_remove_device()`].
    ///
    /// # Errors
    ///
    /// - [`InputError::OpenRestricted`] if the node could not be opened. This is also
    ///   logged at info priority.
    /// - [`InputError::SourceRegistration`] if the descriptor could not be polled. The
    ///   descriptor is closed again and no device is left behind.
    ///
    /// [`EventType::DeviceAdded`]: crate::EventType::DeviceAdded
    /// [`RestrictedIo`]: crate::RestrictedIo
    pub fn path_add_device<F>(
        &mut self,
        path: &str,
        capabilities: DeviceCapabilities,
        backend: F,
    ) -> InputResult<DeviceId>
    where
        F: FnMut(&mut Context, DeviceId, BorrowedFd<'_>) + 'static,
    {
        let fd = match self
            .restricted_io
            .open_restricted(Path::new(path), DEVICE_OPEN_FLAGS)
        {
            Ok(fd) => fd,
            Err(source) => {
                self.logger
                    .info(&format!("opening input device '{path}' failed ({source})"));
                return Err(InputError::OpenRestricted {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        // The device takes its own seat reference, so ours is only held across the
        // creation.
        let seat = self
            .graph
            .get_or_create_seat(DEFAULT_SEAT_PHYSICAL_NAME, DEFAULT_SEAT_LOGICAL_NAME);
        let created = self.graph.create_device(seat, path, capabilities);
        self.graph.seat_unref(seat)?;
        let device = match created {
            Ok(device) => device,
            Err(err) => {
                self.restricted_io.close_restricted(fd);
                return Err(err.into());
            }
        };

        let source = match self.register_device_source(device, &fd, backend) {
            Ok(source) => source,
            Err(err) => {
                self.restricted_io.close_restricted(fd);
                self.device_unref(device)?;
                return Err(err);
            }
        };

        let record = self.graph.device_mut(device)?;
        record.fd = Some(fd);
        record.source = Some(source);

        tracing::debug!(message = "device added", path, capabilities = ?capabilities);
        self.post_event(
            device,
            EventKind::DeviceAdded(DeviceNotifyEvent {
                time_usec: now_usec(),
            }),
        )?;
        Ok(device)
    }

    /// Stops polling the device, closes its descriptor through the [`RestrictedIo`],
    /// queues a [`EventType::DeviceRemoved`] event, and drops the caller's reference.
    /// Queued events keep the device alive until they are destroyed.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was already destroyed. A source
    /// that was already removed through [`Self::remove_source()`] is not an error.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    /// [`EventType::DeviceRemoved`]: crate::EventType::DeviceRemoved
    /// [`RestrictedIo`]: crate::RestrictedIo
    pub fn path_remove_device(&mut self, device: DeviceId) -> InputResult<()> {
        let record = self.graph.device_mut(device)?;
        let source = record.source.take();
        let fd = record.fd.take();

        // Deregister before the descriptor goes away. The caller may have removed the
        // source already; the descriptor still has to be closed.
        if let Some(source) = source
            && let Err(err) = self.multiplexer.remove_source(source)
        {
            tracing::debug!(message = "device source already gone", error = %err);
        }
        if let Some(fd) = fd {
            self.restricted_io.close_restricted(fd);
        }

        tracing::debug!(message = "device removed", device = ?device);
        self.post_event(
            device,
            EventKind::DeviceRemoved(DeviceNotifyEvent {
                time_usec: now_usec(),
            }),
        )?;
        self.device_unref(device)
    }

    /// The source owns a duplicate of the descriptor, so the registration stays valid
    /// until the source itself is freed, even after the device's copy is closed.
    fn register_device_source<F>(
        &mut self,
        device: DeviceId,
        fd: &OwnedFd,
        mut backend: F,
    ) -> InputResult<SourceId>
    where
        F: FnMut(&mut Context, DeviceId, BorrowedFd<'_>) + 'static,
    {
        let source_fd = fd
            .try_clone()
            .map_err(|source| InputError::SourceRegistration {
                fd: fd.as_raw_fd(),
                source,
            })?;
        let raw_fd = source_fd.as_raw_fd();

        self.multiplexer.add_fd(raw_fd, move |context: &mut Context| {
            backend(context, device, source_fd.as_fd());
        })
    }
}
