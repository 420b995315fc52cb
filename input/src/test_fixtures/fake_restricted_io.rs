// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::RestrictedIo;
use rustix::{fs::OFlags, io::Errno};
use std::{cell::RefCell,
          collections::{HashMap, HashSet},
          io::{self, Write},
          os::{fd::OwnedFd, unix::net::UnixStream},
          path::Path,
          rc::Rc};

/// A [`RestrictedIo`] over Unix socket pairs instead of device nodes. Opening a known
/// path hands out the read end of a fresh pair; the test writes raw records into the
/// other end with [`Self::write()`].
///
/// Clones share state, so keep one clone in the test and box another into the
/// context.
#[derive(Debug, Clone, Default)]
pub struct FakeRestrictedIo {
    state: Rc<RefCell<FakeNodes>>,
}

#[derive(Debug, Default)]
struct FakeNodes {
    known_paths: HashSet<String>,
    writers: HashMap<String, UnixStream>,
    open_count: usize,
    close_count: usize,
}

impl FakeRestrictedIo {
    /// Makes `path` openable. Anything else fails with `ENOENT`.
    pub fn add_node(&self, path: &str) {
        self.state.borrow_mut().known_paths.insert(path.to_owned());
    }

    /// # Panics
    ///
    /// If `path` was never opened.
    pub fn write(&self, path: &str, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        let writer = state.writers.get_mut(path).unwrap();
        writer.write_all(bytes).unwrap();
    }

    #[must_use]
    pub fn open_count(&self) -> usize { self.state.borrow().open_count }

    #[must_use]
    pub fn close_count(&self) -> usize { self.state.borrow().close_count }
}

impl RestrictedIo for FakeRestrictedIo {
    fn open_restricted(&mut self, path: &Path, flags: OFlags) -> io::Result<OwnedFd> {
        let key = path.to_string_lossy().into_owned();
        let mut state = self.state.borrow_mut();
        if !state.known_paths.contains(&key) {
            return Err(io::Error::from(Errno::NOENT));
        }

        let (reader, writer) = UnixStream::pair()?;
        reader.set_nonblocking(flags.contains(OFlags::NONBLOCK))?;
        state.writers.insert(key, writer);
        state.open_count += 1;
        Ok(reader.into())
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        self.state.borrow_mut().close_count += 1;
        drop(fd);
    }
}
