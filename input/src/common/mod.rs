// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod arena;
pub mod event_queue;
pub mod rate_limit;

// Re-export.
pub use arena::*;
pub use event_queue::*;
pub use rate_limit::*;
