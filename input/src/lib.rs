// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words epoll kqueue

//! # r3bl_input
//!
//! The event pipeline core of an input-event abstraction library. Raw events read from
//! device descriptors (keyboards, pointers, touch and gesture sources) are normalized
//! into a portable [`Event`] model and handed to the consumer through a poll-driven,
//! pull-style API.
//!
//! # Architecture Overview
//!
//! ```text
//! caller ──register fd──► Multiplexer (mio: epoll/kqueue)
//!                             │ ready
//!                             ▼
//!                        backend callback ── reads raw bytes
//!                             │ notify (key / button / motion / ...)
//!                             ▼
//!            capability gate ─► seat counters ─► EventQueue (ring buffer)
//!                                                     │
//! caller ◄──── get_next_event() / peek_next_event_type() ┘
//! ```
//!
//! | Piece               | Where                   | What it does                                  |
//! | :------------------ | :---------------------- | :-------------------------------------------- |
//! | [`Multiplexer`]     | [`mux`]                 | fd registration, poll, deferred source free   |
//! | [`Seat`] [`Device`] | [`graph`]               | ref-counted ownership graph                   |
//! | [`Event`]           | [`event`]               | closed sum type of event variants             |
//! | [`EventQueue`]      | [`common`]              | growable power-of-two ring buffer, FIFO       |
//! | [`Context`]         | [`context`]             | ties everything together, public pull API     |
//!
//! # Threading
//!
//! Everything is single-threaded and non-reentrant. [`Context::dispatch()`] is the only
//! call that may block, and only for the configured [`ContextConfig::dispatch_timeout`].
//! A dispatch callback may unregister any source (including its own); the source record
//! is only freed once the current pass is over.
//!
//! # Quick start
//!
//! ```no_run
//! use r3bl_input::{Context, DeviceCapabilities, SystemRestrictedIo};
//!
//! # fn main() -> r3bl_input::InputResult<()> {
//! let mut context = Context::new(Box::new(SystemRestrictedIo))?;
//! let path = "/dev/wskbd";
//! let _device = context.path_add_device(
//!     path,
//!     DeviceCapabilities::from_device_path(path),
//!     |_context, _device, _fd| {
//!         // Read raw records from the fd and call the notify functions.
//!     },
//! )?;
//! context.dispatch()?;
//! while let Some(event) = context.get_next_event() {
//!     println!("{}", event.event_type());
//!     context.event_destroy(event)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`ContextConfig::dispatch_timeout`]: crate::ContextConfig::dispatch_timeout
//! [`Context::dispatch()`]: crate::Context::dispatch
//! [`Context`]: crate::Context
//! [`Device`]: crate::Device
//! [`EventQueue`]: crate::EventQueue
//! [`Event`]: crate::Event
//! [`Multiplexer`]: crate::Multiplexer
//! [`Seat`]: crate::Seat

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod common;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod graph;
pub mod log;
pub mod mux;

#[cfg(test)]
pub mod test_fixtures;

// Re-export stable public API using glob imports for ergonomic, flat API surface.
pub use common::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use event::*;
pub use graph::*;
pub use log::*;
pub use mux::*;
