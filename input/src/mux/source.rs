// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::ArenaId;
use mio::Token;
use std::{fmt::{Debug, Formatter},
          os::fd::RawFd};

/// Marks a source that was removed but not yet freed.
pub const INVALID_FD: RawFd = -1;

/// Called with the owner of the [`Multiplexer`] each time the source's descriptor is
/// readable. Anything the callback needs beyond the owner, it captures.
///
/// [`Multiplexer`]: crate::Multiplexer
pub type SourceDispatch<C> = Box<dyn FnMut(&mut C)>;

/// Handle to one registration. Its arena index doubles as the [`mio::Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub(crate) ArenaId);

impl SourceId {
    #[must_use]
    pub fn token(self) -> Token { Token(self.0.index) }
}

/// One descriptor registered for read readiness, plus its callback.
///
/// `dispatch` is `None` only while the callback is running, since it is moved out so
/// the callback can borrow the owner mutably.
pub struct Source<C> {
    pub(crate) fd: RawFd,
    pub(crate) dispatch: Option<SourceDispatch<C>>,
}

impl<C> Debug for Source<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("fd", &self.fd)
            .field("is_dispatching", &self.dispatch.is_none())
            .finish()
    }
}

impl<C> Source<C> {
    #[must_use]
    pub fn fd(&self) -> RawFd { self.fd }

    /// False once the source has been removed, even though it is still allocated
    /// until the end of the pass.
    #[must_use]
    pub fn is_live(&self) -> bool { self.fd != INVALID_FD }
}
