// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod multiplexer;
pub mod source;

// Re-export.
pub use multiplexer::*;
pub use source::*;
