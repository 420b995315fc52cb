// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The pull API. I/O readiness and event consumption are separate steps:
//!
//! ```text
//! loop {
//!     wait on context.as_raw_fd() in your own loop (optional)
//!     context.dispatch()?               // callbacks run, events get queued
//!     while let Some(event) = context.get_next_event() {
//!         handle(&event);
//!         context.event_destroy(event)?;
//!     }
//! }
//! ```

use super::Context;
use crate::{Event, EventType, InputResult, SourceId, poll_and_dispatch};
use std::{os::fd::RawFd, time::Duration};

impl Context {
    /// One pass with the configured timeout. See [`Self::dispatch_timeout()`].
    ///
    /// # Errors
    ///
    /// [`InputError::Poll`] if polling failed.
    ///
    /// [`InputError::Poll`]: crate::InputError::Poll
    pub fn dispatch(&mut self) -> InputResult<()> {
        let timeout = self.dispatch_timeout;
        self.dispatch_timeout(timeout)
    }

    /// Polls once, waiting at most `timeout` (`None` waits until a source is ready),
    /// runs the callback of every ready source, then frees the sources removed during
    /// the pass. Does not touch the event queue.
    ///
    /// # Errors
    ///
    /// [`InputError::Poll`] if polling failed. It is not retried; use
    /// [`InputError::negated_errno()`] for a C style status.
    ///
    /// [`InputError::Poll`]: crate::InputError::Poll
    /// [`InputError::negated_errno()`]: crate::InputError::negated_errno
    pub fn dispatch_timeout(&mut self, timeout: Option<Duration>) -> InputResult<()> {
        match poll_and_dispatch(self, timeout) {
            Ok(dispatched) => {
                tracing::debug!(message = "dispatch pass", dispatched);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(message = "dispatch failed", error = %err);
                Err(err)
            }
        }
    }

    /// Polls an extra descriptor alongside the devices, eg: a pipe that wakes a
    /// blocking [`Self::dispatch()`] early. The descriptor is borrowed and must stay
    /// open until [`Self::remove_source()`].
    ///
    /// # Errors
    ///
    /// [`InputError::SourceRegistration`] if the OS refused the descriptor.
    ///
    /// [`InputError::SourceRegistration`]: crate::InputError::SourceRegistration
    pub fn add_source(
        &mut self,
        fd: RawFd,
        dispatch: impl FnMut(&mut Context) + 'static,
    ) -> InputResult<SourceId> {
        self.multiplexer.add_fd(fd, dispatch)
    }

    /// Safe to call from inside any dispatch callback. The source is freed once the
    /// current pass is over.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleSource`] or [`ContractViolation::SourceAlreadyRemoved`]
    /// if it was removed before.
    ///
    /// [`ContractViolation::SourceAlreadyRemoved`]: crate::ContractViolation::SourceAlreadyRemoved
    /// [`ContractViolation::StaleSource`]: crate::ContractViolation::StaleSource
    pub fn remove_source(&mut self, source: SourceId) -> InputResult<()> {
        self.multiplexer.remove_source(source)
    }

    /// The oldest queued event. It still holds its device reference; hand it to
    /// [`Self::event_destroy()`] when done; a dropped event keeps its device alive
    /// until the context is torn down.
    #[must_use]
    pub fn get_next_event(&mut self) -> Option<Event> { self.events.pop() }

    #[must_use]
    pub fn peek_next_event_type(&self) -> Option<EventType> {
        self.events.peek().map(Event::event_type)
    }

    #[must_use]
    pub fn pending_event_count(&self) -> usize { self.events.len() }
}
