// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod log_priority;
pub mod logger;
pub mod tracing_init;

// Re-export.
pub use log_priority::*;
pub use logger::*;
pub use tracing_init::*;
