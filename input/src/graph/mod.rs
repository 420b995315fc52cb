// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod capabilities;
pub mod codes;
pub mod device;
pub mod ownership_graph;
pub mod seat;
pub mod seat_counts;

// Re-export.
pub use capabilities::*;
pub use codes::*;
pub use device::*;
pub use ownership_graph::*;
pub use seat::*;
pub use seat_counts::*;
