// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod fake_restricted_io;
pub mod log_capture;
pub mod two_byte_backend;

// Re-export.
pub use fake_restricted_io::*;
pub use log_capture::*;
pub use two_byte_backend::*;

use crate::Context;

/// A context whose restricted I/O knows no device nodes.
pub fn test_context() -> Context {
    Context::new(Box::new(FakeRestrictedIo::default())).unwrap()
}

/// A context sharing `fake_io`'s state.
pub fn test_context_with(fake_io: &FakeRestrictedIo) -> Context {
    Context::new(Box::new(fake_io.clone())).unwrap()
}
