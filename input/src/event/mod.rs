// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod coords;
pub mod event_type;
pub mod input_event;
pub mod payloads;

// Re-export.
pub use coords::*;
pub use event_type::*;
pub use input_event::*;
pub use payloads::*;
