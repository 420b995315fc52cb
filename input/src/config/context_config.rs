// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InputError, InputResult, LogPriority, RateLimit};
use std::time::Duration;

/// Initial event queue capacity. Grows by doubling.
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Capacity for the [`mio::Events`] buffer, ie: the most sources serviced per pass.
pub const DEFAULT_READY_EVENTS_CAPACITY: usize = 8;

/// Capability-gate diagnostics allowed per [`DEFAULT_BUG_LOG_INTERVAL`].
pub const DEFAULT_BUG_LOG_BURST: u32 = 5;

pub const DEFAULT_BUG_LOG_INTERVAL: Duration = Duration::from_secs(30);

/// Knobs for [`Context::with_config()`]. Start from [`Default`] and chain the `with_*`
/// setters:
///
/// ```
/// use r3bl_input::{ContextConfig, LogPriority};
/// use std::time::Duration;
///
/// let config = ContextConfig::default()
///     .with_dispatch_timeout(Some(Duration::from_millis(16)))
///     .with_log_priority(LogPriority::Info);
/// assert!(config.validate().is_ok());
/// ```
///
/// [`Context::with_config()`]: crate::Context::with_config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Must be a non-zero power of two.
    pub initial_queue_capacity: usize,
    /// How long [`Context::dispatch()`] may block. `Some(Duration::ZERO)` never blocks,
    /// `None` blocks until a source is ready.
    ///
    /// [`Context::dispatch()`]: crate::Context::dispatch
    pub dispatch_timeout: Option<Duration>,
    /// Most ready sources returned by a single poll. Must be non-zero.
    pub ready_events_capacity: usize,
    pub log_priority: LogPriority,
    /// Limits "missing capability" diagnostics so a misbehaving backend can't flood
    /// the log.
    pub bug_log_ratelimit: RateLimit,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            initial_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dispatch_timeout: Some(Duration::ZERO),
            ready_events_capacity: DEFAULT_READY_EVENTS_CAPACITY,
            log_priority: LogPriority::default(),
            bug_log_ratelimit: RateLimit::new(
                DEFAULT_BUG_LOG_INTERVAL,
                DEFAULT_BUG_LOG_BURST,
            ),
        }
    }
}

impl ContextConfig {
    #[must_use]
    pub fn with_initial_queue_capacity(mut self, capacity: usize) -> Self {
        self.initial_queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_dispatch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_ready_events_capacity(mut self, capacity: usize) -> Self {
        self.ready_events_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_log_priority(mut self, priority: LogPriority) -> Self {
        self.log_priority = priority;
        self
    }

    #[must_use]
    pub fn with_bug_log_ratelimit(mut self, interval: Duration, burst: u32) -> Self {
        self.bug_log_ratelimit = RateLimit::new(interval, burst);
        self
    }

    /// # Errors
    ///
    /// Returns [`InputError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> InputResult<()> {
        if !self.initial_queue_capacity.is_power_of_two() {
            return Err(InputError::InvalidConfig {
                reason: format!(
                    "initial_queue_capacity must be a non-zero power of two, got {}",
                    self.initial_queue_capacity
                ),
            });
        }
        if self.ready_events_capacity == 0 {
            return Err(InputError::InvalidConfig {
                reason: "ready_events_capacity must be non-zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let config = ContextConfig::default();
        assert_eq!(config.initial_queue_capacity, 4);
        assert_eq!(config.dispatch_timeout, Some(Duration::ZERO));
        assert_eq!(config.log_priority, LogPriority::Error);
        assert!(config.validate().is_ok());
    }

    #[test_case(0, 8, false)]
    #[test_case(3, 8, false)]
    #[test_case(4, 0, false)]
    #[test_case(1, 1, true)]
    #[test_case(64, 32, true)]
    fn test_validate(queue: usize, ready: usize, is_ok: bool) {
        let config = ContextConfig::default()
            .with_initial_queue_capacity(queue)
            .with_ready_events_capacity(ready);
        assert_eq!(config.validate().is_ok(), is_ok);
    }
}
