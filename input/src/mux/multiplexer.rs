// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words epoll kqueue reregister

//! # Source multiplexer
//!
//! A thin adapter over [`mio::Poll`] that maps each registered descriptor to a
//! callback.
//!
//! ## Level-triggered on top of edge-triggered
//!
//! [`mio`] registrations are edge-triggered, but a device backend is allowed to read
//! only part of what is pending and expect to be called again. So after a callback
//! returns, its source is re-armed with [`Registry::reregister()`]; if the descriptor
//! is still readable the OS queues it again and the next poll reports it.
//!
//! ## Deferred destruction
//!
//! A callback may remove any source, including its own, while the pass is still
//! walking the ready list. [`Multiplexer::remove_source()`] therefore only
//! deregisters the descriptor, swaps it for [`INVALID_FD`], and queues the source on
//! a pending list:
//!
//! ```text
//! ready tokens: [A, B, C]
//!   A runs ── removes B ──► B.fd = INVALID_FD, pending = [B]
//!   B skipped (invalid)
//!   C runs
//! end of pass ──► free everything in pending
//! ```
//!
//! Nothing is freed until [`poll_and_dispatch()`] is done with the ready list, so no
//! token can refer to a reused slot mid-pass.
//!
//! [`Registry::reregister()`]: mio::Registry::reregister

use super::{INVALID_FD, Source, SourceDispatch, SourceId};
use crate::{Arena, ContractViolation, InputError, InputResult};
use mio::{Events, Interest, Poll, Token, unix::SourceFd};
use smallvec::SmallVec;
use std::{fmt::{Debug, Formatter},
          os::fd::{AsRawFd, RawFd},
          time::Duration};

/// Ready tokens collected per pass before any callback runs. Spills to the heap past
/// this.
const READY_TOKENS_INLINE: usize = 8;

/// Implemented by whatever owns a [`Multiplexer`], so callbacks receive the owner
/// itself (eg: the [`Context`]) instead of an opaque user pointer.
///
/// [`Context`]: crate::Context
pub trait MultiplexerOwner: Sized {
    fn multiplexer(&mut self) -> &mut Multiplexer<Self>;
}

pub struct Multiplexer<C> {
    poll_handle: Poll,
    ready_events_buffer: Events,
    sources: Arena<Source<C>>,
    pending_destroy: Vec<SourceId>,
}

impl<C> Debug for Multiplexer<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multiplexer")
            .field("poll_fd", &self.poll_handle.as_raw_fd())
            .field("sources", &self.sources)
            .field("pending_destroy", &self.pending_destroy)
            .finish_non_exhaustive()
    }
}

impl<C> AsRawFd for Multiplexer<C> {
    fn as_raw_fd(&self) -> RawFd { self.poll_handle.as_raw_fd() }
}

impl<C> Multiplexer<C> {
    /// # Errors
    ///
    /// [`InputError::PollCreation`] if the OS readiness facility could not be created.
    pub fn new(ready_events_capacity: usize) -> InputResult<Self> {
        let poll_handle = Poll::new().map_err(InputError::PollCreation)?;
        Ok(Self {
            poll_handle,
            ready_events_buffer: Events::with_capacity(ready_events_capacity),
            sources: Arena::new(),
            pending_destroy: Vec::new(),
        })
    }

    /// Registers `fd` for read readiness. The descriptor is not owned; it must stay
    /// open until the source is removed.
    ///
    /// # Errors
    ///
    /// [`InputError::SourceRegistration`] if the OS refused the descriptor. Nothing is
    /// left registered in that case.
    pub fn add_fd(
        &mut self,
        fd: RawFd,
        dispatch: impl FnMut(&mut C) + 'static,
    ) -> InputResult<SourceId> {
        let id = SourceId(self.sources.insert(Source {
            fd,
            dispatch: Some(Box::new(dispatch)),
        }));

        if let Err(source) = self.poll_handle.registry().register(
            &mut SourceFd(&fd),
            id.token(),
            Interest::READABLE,
        ) {
            self.sources.remove(id.0);
            return Err(InputError::SourceRegistration { fd, source });
        }

        tracing::debug!(message = "mux: source registered", fd, token = id.token().0);
        Ok(id)
    }

    /// Deregisters the descriptor and schedules the source to be freed at the end of
    /// the current (or next) pass. Safe to call from inside any callback.
    ///
    /// # Errors
    ///
    /// - [`ContractViolation::StaleSource`] if the source was already freed.
    /// - [`ContractViolation::SourceAlreadyRemoved`] if it is already pending.
    pub fn remove_source(&mut self, id: SourceId) -> InputResult<()> {
        let source = self
            .sources
            .get_mut(id.0)
            .ok_or(ContractViolation::StaleSource)?;
        if !source.is_live() {
            return Err(ContractViolation::SourceAlreadyRemoved.into());
        }
        let fd = std::mem::replace(&mut source.fd, INVALID_FD);

        // The descriptor may already be closed, which is fine.
        if let Err(err) = self.poll_handle.registry().deregister(&mut SourceFd(&fd)) {
            tracing::debug!(message = "mux: deregister failed", fd, error = %err);
        }

        self.pending_destroy.push(id);
        Ok(())
    }

    /// Frees every source removed since the last call.
    pub fn drop_destroyed_sources(&mut self) {
        for id in self.pending_destroy.drain(..) {
            self.sources.remove(id.0);
        }
    }

    /// Sources that are registered and not removed.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len() - self.pending_destroy.len()
    }

    #[must_use]
    pub fn pending_destroy_count(&self) -> usize { self.pending_destroy.len() }

    #[must_use]
    pub fn is_live(&self, id: SourceId) -> bool {
        self.sources.get(id.0).is_some_and(Source::is_live)
    }

    fn poll_ready_tokens(
        &mut self,
        timeout: Option<Duration>,
    ) -> InputResult<SmallVec<[Token; READY_TOKENS_INLINE]>> {
        self.poll_handle
            .poll(&mut self.ready_events_buffer, timeout)
            .map_err(InputError::Poll)?;

        Ok(self
            .ready_events_buffer
            .iter()
            .filter(|event| event.is_readable() || event.is_read_closed())
            .map(mio::event::Event::token)
            .collect())
    }

    /// Moves the callback out of a live source so it can borrow the owner.
    fn take_dispatch(&mut self, token: Token) -> Option<(SourceId, SourceDispatch<C>)> {
        let (id, source) = self.sources.get_mut_by_index(token.0)?;
        if !source.is_live() {
            return None;
        }
        source.dispatch.take().map(|dispatch| (SourceId(id), dispatch))
    }

    /// Puts the callback back and re-arms the source if the callback left it live.
    fn restore_dispatch(&mut self, id: SourceId, dispatch: SourceDispatch<C>) {
        let Some(source) = self.sources.get_mut(id.0) else {
            return;
        };
        source.dispatch = Some(dispatch);
        if !source.is_live() {
            return;
        }

        let fd = source.fd;
        if let Err(err) = self.poll_handle.registry().reregister(
            &mut SourceFd(&fd),
            id.token(),
            Interest::READABLE,
        ) {
            tracing::debug!(message = "mux: re-arm failed", fd, error = %err);
        }
    }
}

/// One pass: poll once, run the callback of every ready live source, then free the
/// sources removed during the pass. Returns how many callbacks ran.
///
/// # Errors
///
/// [`InputError::Poll`] if polling failed. It is never retried here, and the pending
/// list is left for the next successful pass.
pub fn poll_and_dispatch<C: MultiplexerOwner>(
    owner: &mut C,
    timeout: Option<Duration>,
) -> InputResult<usize> {
    let ready_tokens = owner.multiplexer().poll_ready_tokens(timeout)?;

    let mut dispatched = 0;
    for token in ready_tokens {
        let Some((id, mut dispatch)) = owner.multiplexer().take_dispatch(token) else {
            continue;
        };
        dispatch(owner);
        owner.multiplexer().restore_dispatch(id, dispatch);
        dispatched += 1;
    }

    owner.multiplexer().drop_destroyed_sources();
    Ok(dispatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{io::{Read, Write},
              os::unix::net::UnixStream};

    const WAIT: Option<Duration> = Some(Duration::from_millis(500));
    const NO_WAIT: Option<Duration> = Some(Duration::ZERO);

    #[derive(Debug)]
    struct TestOwner {
        mux: Multiplexer<TestOwner>,
        calls: Vec<&'static str>,
        ids: Vec<SourceId>,
        readers: Vec<UnixStream>,
        writers: Vec<UnixStream>,
    }

    impl MultiplexerOwner for TestOwner {
        fn multiplexer(&mut self) -> &mut Multiplexer<Self> { &mut self.mux }
    }

    impl TestOwner {
        fn new() -> Self {
            Self {
                mux: Multiplexer::new(8).unwrap(),
                calls: vec![],
                ids: vec![],
                readers: vec![],
                writers: vec![],
            }
        }

        /// Adds a socket pair with one byte already pending on the read side.
        fn add_readable(
            &mut self,
            dispatch: impl FnMut(&mut TestOwner) + 'static,
        ) -> SourceId {
            let (reader, mut writer) = UnixStream::pair().unwrap();
            reader.set_nonblocking(true).unwrap();
            writer.write_all(b"x").unwrap();
            let id = self.mux.add_fd(reader.as_raw_fd(), dispatch).unwrap();
            self.readers.push(reader);
            self.writers.push(writer);
            self.ids.push(id);
            id
        }
    }

    #[test]
    fn test_still_readable_source_is_reported_again() {
        let mut owner = TestOwner::new();
        owner.add_readable(|owner| owner.calls.push("a"));

        // Never read, so it stays readable.
        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 1);
        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 1);
        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 1);
        assert_eq!(owner.calls, vec!["a", "a", "a"]);
    }

    #[test]
    fn test_drained_source_is_quiet() {
        let mut owner = TestOwner::new();
        owner.add_readable(|owner| {
            let mut buf = [0_u8; 8];
            let _unused = owner.readers[0].read(&mut buf);
            owner.calls.push("a");
        });

        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 1);
        assert_eq!(poll_and_dispatch(&mut owner, NO_WAIT).unwrap(), 0);

        owner.writers[0].write_all(b"y").unwrap();
        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 1);
        assert_eq!(owner.calls, vec!["a", "a"]);
    }

    #[test]
    fn test_self_removal_mid_pass() {
        let mut owner = TestOwner::new();
        owner.add_readable(|owner| {
            let me = owner.ids[0];
            owner.mux.remove_source(me).unwrap();
            owner.calls.push("a");
        });
        owner.add_readable(|owner| owner.calls.push("b"));

        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 2);
        let mut calls = owner.calls.clone();
        calls.sort_unstable();
        assert_eq!(calls, vec!["a", "b"]);

        // Freed at the end of the pass.
        assert_eq!(owner.mux.pending_destroy_count(), 0);
        assert_eq!(owner.mux.source_count(), 1);
        assert!(!owner.mux.is_live(owner.ids[0]));

        owner.calls.clear();
        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 1);
        assert_eq!(owner.calls, vec!["b"]);
    }

    #[test]
    fn test_mutual_removal_runs_exactly_one() {
        let mut owner = TestOwner::new();
        owner.add_readable(|owner| {
            let other = owner.ids[1];
            owner.mux.remove_source(other).unwrap();
            owner.calls.push("a");
        });
        owner.add_readable(|owner| {
            let other = owner.ids[0];
            owner.mux.remove_source(other).unwrap();
            owner.calls.push("b");
        });

        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 1);
        assert_eq!(owner.calls.len(), 1);
        assert_eq!(owner.mux.source_count(), 1);
        assert_eq!(owner.mux.pending_destroy_count(), 0);
    }

    #[test]
    fn test_removal_outside_pass_is_deferred() {
        let mut owner = TestOwner::new();
        let id = owner.add_readable(|owner| owner.calls.push("a"));

        owner.mux.remove_source(id).unwrap();
        assert!(!owner.mux.is_live(id));
        assert_eq!(owner.mux.pending_destroy_count(), 1);
        assert!(matches!(
            owner.mux.remove_source(id),
            Err(InputError::ContractViolation(
                ContractViolation::SourceAlreadyRemoved
            ))
        ));

        assert_eq!(poll_and_dispatch(&mut owner, NO_WAIT).unwrap(), 0);
        assert_eq!(owner.mux.pending_destroy_count(), 0);
        assert!(owner.calls.is_empty());
        assert!(matches!(
            owner.mux.remove_source(id),
            Err(InputError::ContractViolation(ContractViolation::StaleSource))
        ));
    }

    #[test]
    fn test_hangup_is_dispatched() {
        let mut owner = TestOwner::new();
        let (reader, writer) = UnixStream::pair().unwrap();
        owner
            .mux
            .add_fd(reader.as_raw_fd(), |owner: &mut TestOwner| {
                owner.calls.push("closed");
            })
            .unwrap();
        drop(writer);

        assert_eq!(poll_and_dispatch(&mut owner, WAIT).unwrap(), 1);
        assert_eq!(owner.calls, vec!["closed"]);
        drop(reader);
    }

    #[test]
    fn test_register_bad_fd() {
        let mut owner = TestOwner::new();
        let result = owner.mux.add_fd(INVALID_FD, |_: &mut TestOwner| {});
        assert!(matches!(
            result,
            Err(InputError::SourceRegistration { fd: INVALID_FD, .. })
        ));
        assert_eq!(owner.mux.source_count(), 0);
        assert!(owner.mux.as_raw_fd() >= 0);
    }

    #[test]
    fn test_nothing_ready() {
        let mut owner = TestOwner::new();
        assert_eq!(poll_and_dispatch(&mut owner, NO_WAIT).unwrap(), 0);
    }
}
