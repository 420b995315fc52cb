// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::{Duration, Instant};

/// This enum represents the outcome of asking a [`RateLimit`] whether one more message
/// may go out:
/// - [`RateLimitState::Ok`]: Below the burst threshold, let it through.
/// - [`RateLimitState::Threshold`]: This is the last message allowed in the current
///   window. Let it through, and tell the reader that more will be discarded.
/// - [`RateLimitState::Exceeded`]: The burst for the current window is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitState {
    Ok,
    Threshold,
    Exceeded,
}

/// Allows at most [`Self::burst`] messages per [`Self::interval`]. Follow these steps
/// to use it:
///
/// 1. Create a [`Self::new`] instance with the window length and the burst size.
/// 2. Before emitting a message, call [`Self::test`] with the current time (or
///    [`Self::test_now`]).
///    - [`RateLimitState::Ok`] or [`RateLimitState::Threshold`]: emit it.
///    - [`RateLimitState::Exceeded`]: drop it.
///
/// A window starts on the first message and lasts for [`Self::interval`]; the first
/// message after the window has elapsed starts a fresh one. A zero interval or a zero
/// burst disables limiting entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    /// Length of one window.
    pub interval: Duration,
    /// Messages allowed per window.
    pub burst: u32,
    /// Start of the current window, `None` before the first message.
    pub window_begin: Option<Instant>,
    /// Messages seen in the current window.
    pub num_in_window: u32,
}

impl RateLimit {
    #[must_use]
    pub fn new(interval: Duration, burst: u32) -> Self {
        Self {
            interval,
            burst,
            window_begin: None,
            num_in_window: 0,
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool { self.interval.is_zero() || self.burst == 0 }

    pub fn test_now(&mut self) -> RateLimitState { self.test(Instant::now()) }

    pub fn test(&mut self, now: Instant) -> RateLimitState {
        if self.is_disabled() {
            return RateLimitState::Ok;
        }

        let window_expired = match self.window_begin {
            None => true,
            Some(begin) => now.saturating_duration_since(begin) > self.interval,
        };

        if window_expired {
            self.window_begin.replace(now);
            self.num_in_window = 1;
            return RateLimitState::Ok;
        }

        if self.num_in_window < self.burst {
            self.num_in_window += 1;
            return if self.num_in_window == self.burst {
                RateLimitState::Threshold
            } else {
                RateLimitState::Ok
            };
        }

        RateLimitState::Exceeded
    }
}
