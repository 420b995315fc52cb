// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Priority filtered, pluggable log sink owned by each [`Context`].
//!
//! [`Context`]: crate::Context

use super::{BugKind, LogPriority};
use crate::{RateLimit, RateLimitState};
use std::fmt::{Debug, Formatter};

/// Receives every message that passes the [`Logger`]'s priority filter.
pub type LogHandler = Box<dyn FnMut(LogPriority, &str)>;

/// The default [`LogHandler`]. Forwards to [`tracing`], so whatever subscriber the
/// application installed (see [`try_initialize_tracing()`]) decides where it goes.
///
/// [`try_initialize_tracing()`]: crate::try_initialize_tracing
pub fn tracing_log_handler(priority: LogPriority, message: &str) {
    match priority {
        LogPriority::Debug => tracing::debug!(message = %message),
        LogPriority::Info => tracing::info!(message = %message),
        LogPriority::Error => tracing::error!(message = %message),
    }
}

pub struct Logger {
    priority: LogPriority,
    handler: Option<LogHandler>,
}

impl Debug for Logger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("priority", &self.priority)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl Logger {
    /// A logger that forwards to [`tracing_log_handler()`].
    #[must_use]
    pub fn new(priority: LogPriority) -> Self {
        Self {
            priority,
            handler: Some(Box::new(tracing_log_handler)),
        }
    }

    #[must_use]
    pub fn priority(&self) -> LogPriority { self.priority }

    pub fn set_priority(&mut self, priority: LogPriority) { self.priority = priority; }

    /// `None` silences this logger.
    pub fn set_handler(&mut self, handler: Option<LogHandler>) { self.handler = handler; }

    pub fn log(&mut self, priority: LogPriority, message: &str) {
        if priority < self.priority {
            return;
        }
        if let Some(handler) = self.handler.as_mut() {
            handler(priority, message);
        }
    }

    pub fn debug(&mut self, message: &str) { self.log(LogPriority::Debug, message); }

    pub fn info(&mut self, message: &str) { self.log(LogPriority::Info, message); }

    pub fn error(&mut self, message: &str) { self.log(LogPriority::Error, message); }

    pub fn bug(&mut self, kind: BugKind, message: &str) {
        self.error(&format!("{}{message}", kind.prefix()));
    }

    /// Logs through `ratelimit`. The message that hits the burst threshold is followed
    /// by a single notice; everything after it is discarded until the window expires.
    pub fn log_ratelimited(
        &mut self,
        ratelimit: &mut RateLimit,
        priority: LogPriority,
        message: &str,
    ) {
        let state = ratelimit.test_now();
        if state == RateLimitState::Exceeded {
            return;
        }

        self.log(priority, message);

        if state == RateLimitState::Threshold {
            self.log(
                priority,
                &format!(
                    "WARNING: log rate limit exceeded ({} msgs per {}ms). \
                     Discarding future messages.",
                    ratelimit.burst,
                    ratelimit.interval.as_millis()
                ),
            );
        }
    }

    pub fn bug_ratelimited(
        &mut self,
        ratelimit: &mut RateLimit,
        kind: BugKind,
        message: &str,
    ) {
        self.log_ratelimited(
            ratelimit,
            LogPriority::Error,
            &format!("{}{message}", kind.prefix()),
        );
    }
}

impl Default for Logger {
    fn default() -> Self { Self::new(LogPriority::default()) }
}
