// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use rustix::fs::{Mode, OFlags};
use std::{io, os::fd::OwnedFd, path::Path};

/// Flags every device node is opened with.
pub const DEVICE_OPEN_FLAGS: OFlags =
    OFlags::RDWR.union(OFlags::NONBLOCK).union(OFlags::CLOEXEC);

/// The only way the [`Context`] touches device nodes. A compositor typically routes
/// this through a privileged helper (logind, a setuid launcher); tests hand in a fake.
///
/// [`Context`]: crate::Context
pub trait RestrictedIo {
    /// # Errors
    ///
    /// Whatever the open failed with. The context logs it and reports
    /// [`InputError::OpenRestricted`].
    ///
    /// [`InputError::OpenRestricted`]: crate::InputError::OpenRestricted
    fn open_restricted(&mut self, path: &Path, flags: OFlags) -> io::Result<OwnedFd>;

    /// Takes back a descriptor handed out by [`Self::open_restricted()`].
    fn close_restricted(&mut self, fd: OwnedFd);
}

/// Plain `open(2)` and `close(2)`, for processes that already have access to the
/// nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRestrictedIo;

impl RestrictedIo for SystemRestrictedIo {
    fn open_restricted(&mut self, path: &Path, flags: OFlags) -> io::Result<OwnedFd> {
        Ok(rustix::fs::open(path, flags, Mode::empty())?)
    }

    fn close_restricted(&mut self, fd: OwnedFd) { drop(fd); }
}
