// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod context_impl;
pub mod graph_ops;
pub mod notify;
pub mod path_devices;
pub mod queue_ops;
pub mod restricted_io;

// Re-export.
pub use context_impl::*;
pub use path_devices::*;
pub use restricted_io::*;
