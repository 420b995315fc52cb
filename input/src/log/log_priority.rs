// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Minimum priority a message must have to reach the log handler. Ordered, so
/// `Debug < Info < Error`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum LogPriority {
    Debug,
    Info,
    #[default]
    Error,
}

/// Who is to blame for a bug-level diagnostic. Each kind is logged at
/// [`LogPriority::Error`] with its [`Self::prefix()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BugKind {
    /// The OS handed us something impossible.
    Kernel,
    /// An internal inconsistency, eg: an event for a capability the device lacks.
    Library,
    /// The application misused the API.
    Client,
}

impl BugKind {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Kernel => "kernel bug: ",
            Self::Library => "library bug: ",
            Self::Client => "client bug: ",
        }
    }
}
