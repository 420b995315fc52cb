// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::RestrictedIo;
use crate::{ContextConfig, Device, DeviceId, Event, EventKind, EventQueue, InputResult,
            LogHandler, LogPriority, Logger, Multiplexer, MultiplexerOwner, OwnershipGraph,
            QueueGrowError, RateLimit};
use std::{fmt::{Debug, Formatter},
          os::fd::{AsRawFd, RawFd},
          time::Duration};

/// The process-wide handle. Owns the multiplexer, the seat and device graph, the event
/// queue, and the caller's [`RestrictedIo`].
///
/// # Lifecycle
///
/// A context starts with one reference. [`Self::add_ref()`] and [`Self::unref()`]
/// mirror the counting used for seats and devices; dropping the value tears it down
/// regardless of the count. Teardown runs bottom-up:
///
/// 1. Pending events are destroyed, releasing their device references.
/// 2. Every device is destroyed: its source is removed, its descriptor is closed
///    through the [`RestrictedIo`], and it lets go of its seat.
/// 3. Every remaining seat is destroyed.
/// 4. Removed sources are freed and the poll handle is closed.
pub struct Context {
    refcount: u32,
    pub(crate) multiplexer: Multiplexer<Context>,
    pub(crate) graph: OwnershipGraph,
    pub(crate) events: EventQueue<Event>,
    pub(crate) restricted_io: Box<dyn RestrictedIo>,
    pub(crate) logger: Logger,
    pub(crate) bug_log_ratelimit: RateLimit,
    pub(crate) dispatch_timeout: Option<Duration>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("refcount", &self.refcount)
            .field("multiplexer", &self.multiplexer)
            .field("graph", &self.graph)
            .field("pending_events", &self.events.len())
            .field("logger", &self.logger)
            .field("dispatch_timeout", &self.dispatch_timeout)
            .finish_non_exhaustive()
    }
}

impl MultiplexerOwner for Context {
    fn multiplexer(&mut self) -> &mut Multiplexer<Self> { &mut self.multiplexer }
}

impl AsRawFd for Context {
    fn as_raw_fd(&self) -> RawFd { self.multiplexer.as_raw_fd() }
}

impl Context {
    /// A context with [`ContextConfig::default()`].
    ///
    /// # Errors
    ///
    /// [`InputError::PollCreation`] if the readiness facility could not be created.
    ///
    /// [`InputError::PollCreation`]: crate::InputError::PollCreation
    pub fn new(restricted_io: Box<dyn RestrictedIo>) -> InputResult<Self> {
        Self::with_config(restricted_io, ContextConfig::default())
    }

    /// # Errors
    ///
    /// - [`InputError::InvalidConfig`] if `config` fails [`ContextConfig::validate()`].
    /// - [`InputError::PollCreation`] if the readiness facility could not be created.
    ///
    /// No context exists in either case.
    ///
    /// [`InputError::InvalidConfig`]: crate::InputError::InvalidConfig
    /// [`InputError::PollCreation`]: crate::InputError::PollCreation
    pub fn with_config(
        restricted_io: Box<dyn RestrictedIo>,
        config: ContextConfig,
    ) -> InputResult<Self> {
        config.validate()?;
        let multiplexer = Multiplexer::new(config.ready_events_capacity)?;

        let context = Self {
            refcount: 1,
            multiplexer,
            graph: OwnershipGraph::new(),
            events: EventQueue::with_capacity(config.initial_queue_capacity),
            restricted_io,
            logger: Logger::new(config.log_priority),
            bug_log_ratelimit: config.bug_log_ratelimit,
            dispatch_timeout: config.dispatch_timeout,
        };
        tracing::debug!(message = "context created", poll_fd = context.as_raw_fd());
        Ok(context)
    }

    #[must_use]
    pub fn refcount(&self) -> u32 { self.refcount }

    pub fn add_ref(&mut self) { self.refcount += 1; }

    /// Drops one reference. Returns the context while references remain; on the last
    /// one it is torn down and `None` is returned.
    #[must_use]
    pub fn unref(mut self) -> Option<Self> {
        self.refcount = self.refcount.saturating_sub(1);
        if self.refcount > 0 { Some(self) } else { None }
    }

    pub fn set_log_priority(&mut self, priority: LogPriority) {
        self.logger.set_priority(priority);
    }

    #[must_use]
    pub fn log_priority(&self) -> LogPriority { self.logger.priority() }

    /// Replaces the log handler. `None` silences the context.
    pub fn set_log_handler(&mut self, handler: Option<LogHandler>) {
        self.logger.set_handler(handler);
    }

    /// Takes a reference on the event's device, then queues the event. If the queue
    /// could not grow the event is logged and dropped.
    pub(crate) fn post_event(&mut self, device: DeviceId, kind: EventKind) -> InputResult<()> {
        self.graph.device_ref(device)?;

        match self.events.push(Event::new(device, kind)) {
            Ok(()) => Ok(()),
            Err(err) => self.drop_unqueued_event(err),
        }
    }

    /// Logs a queue growth failure and gives back the reference the event took.
    fn drop_unqueued_event(&mut self, err: QueueGrowError<Event>) -> InputResult<()> {
        let QueueGrowError { item, source } = err;
        self.logger.error(&format!(
            "Failed to grow the event queue ({source}), dropping {} event",
            item.event_type()
        ));
        self.event_destroy(item)
    }

    /// Gives back an event's device reference. This may destroy the device.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::StaleDevice`] if the device was already destroyed, which
    /// means its references were miscounted.
    ///
    /// [`ContractViolation::StaleDevice`]: crate::ContractViolation::StaleDevice
    pub fn event_destroy(&mut self, event: Event) -> InputResult<()> {
        self.device_unref(event.device())
    }

    /// Removes the source and closes the descriptor of a device that was destroyed
    /// while still polled.
    pub(crate) fn release_device(&mut self, device: Device) {
        if let Some(source) = device.source
            && let Err(err) = self.multiplexer.remove_source(source)
        {
            tracing::debug!(message = "device source already gone", error = %err);
        }
        if let Some(fd) = device.fd {
            self.restricted_io.close_restricted(fd);
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        while let Some(event) = self.events.pop() {
            if let Err(err) = self.event_destroy(event) {
                tracing::debug!(message = "teardown: event device already gone", error = %err);
            }
        }

        for device in self.graph.tear_down() {
            self.release_device(device);
        }

        self.multiplexer.drop_destroyed_sources();
        tracing::debug!(message = "context destroyed");
    }
}
