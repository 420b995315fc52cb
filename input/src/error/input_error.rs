// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Error types. See [`InputError`] for the taxonomy.

use rustix::io::Errno;
use std::{io, os::fd::RawFd};

/// Convenience alias used by every fallible operation in this crate.
pub type InputResult<T> = Result<T, InputError>;

/// Every failure the pipeline core reports to its caller.
///
/// | Variant                  | Family                 | Context still usable?     |
/// | :----------------------- | :--------------------- | :------------------------ |
/// | [`PollCreation`]         | fatal setup            | No context was created    |
/// | [`InvalidConfig`]        | fatal setup            | No context was created    |
/// | [`SourceRegistration`]   | resource               | Yes                       |
/// | [`OpenRestricted`]       | resource               | Yes                       |
/// | [`Poll`]                 | poll failure           | Yes, retry is up to you   |
/// | [`ContractViolation`]    | programmer error       | Yes, the call was refused |
///
/// Transient queue growth failures and capability mismatches are not errors; they are
/// logged and the event is dropped.
///
/// [`ContractViolation`]: Self::ContractViolation
/// [`InvalidConfig`]: Self::InvalidConfig
/// [`OpenRestricted`]: Self::OpenRestricted
/// [`PollCreation`]: Self::PollCreation
/// [`Poll`]: Self::Poll
/// [`SourceRegistration`]: Self::SourceRegistration
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum InputError {
    /// Failed to create [`mio::Poll`] (epoll/kqueue creation failed).
    #[error("Failed to create mio::Poll")]
    #[diagnostic(
        code(r3bl_input::mux::poll_creation),
        help("This usually means the system ran out of file descriptors")
    )]
    PollCreation(#[source] io::Error),

    /// Adding a descriptor to the readiness facility failed.
    #[error("Failed to register fd {fd} with mio")]
    #[diagnostic(
        code(r3bl_input::mux::source_registration),
        help("Ensure the descriptor is open and supports readiness polling")
    )]
    SourceRegistration {
        fd: RawFd,
        #[source]
        source: io::Error,
    },

    /// [`mio::Poll::poll()`] failed. Never retried internally.
    #[error("Polling input sources failed")]
    #[diagnostic(code(r3bl_input::mux::poll))]
    Poll(#[source] io::Error),

    /// The caller-supplied [`RestrictedIo`] refused to open a device node.
    ///
    /// [`RestrictedIo`]: crate::RestrictedIo
    #[error("Opening input device '{path}' failed")]
    #[diagnostic(
        code(r3bl_input::device::open_restricted),
        help("Check the permissions of the device node")
    )]
    OpenRestricted {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid context configuration: {reason}")]
    #[diagnostic(code(r3bl_input::config::invalid))]
    InvalidConfig { reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    ContractViolation(#[from] ContractViolation),
}

impl InputError {
    /// The negated OS error code, for callers that want a C style status. Errors that
    /// did not come from the OS map to `-EINVAL`.
    #[must_use]
    pub fn negated_errno(&self) -> i32 {
        let raw = match self {
            Self::PollCreation(err)
            | Self::Poll(err)
            | Self::SourceRegistration { source: err, .. }
            | Self::OpenRestricted { source: err, .. } => err.raw_os_error(),
            Self::InvalidConfig { .. } | Self::ContractViolation(_) => None,
        };
        -raw.unwrap_or(Errno::INVAL.raw_os_error())
    }
}

/// A call that broke the documented contract. These are refused instead of aborting
/// the process, but they always indicate a bug in the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ContractViolation {
    #[error("Code {code} is out of range (max {max})")]
    #[diagnostic(code(r3bl_input::contract::code_out_of_range))]
    CodeOutOfRange { code: u32, max: u32 },

    #[error("Seat handle is stale or was never issued by this context")]
    #[diagnostic(code(r3bl_input::contract::stale_seat))]
    StaleSeat,

    #[error("Device handle is stale or was never issued by this context")]
    #[diagnostic(
        code(r3bl_input::contract::stale_device),
        help("A device is released once its last reference is dropped")
    )]
    StaleDevice,

    #[error("Source handle is stale or was never issued by this multiplexer")]
    #[diagnostic(code(r3bl_input::contract::stale_source))]
    StaleSource,

    #[error("Source was already removed")]
    #[diagnostic(code(r3bl_input::contract::source_already_removed))]
    SourceAlreadyRemoved,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_negated_errno() {
        let poll = InputError::Poll(io::Error::from_raw_os_error(4));
        assert_eq!(poll.negated_errno(), -4);

        let stale: InputError = ContractViolation::StaleDevice.into();
        assert_eq!(stale.negated_errno(), -Errno::INVAL.raw_os_error());

        let custom = InputError::Poll(io::Error::other("no errno"));
        assert_eq!(custom.negated_errno(), -Errno::INVAL.raw_os_error());

        let missing = InputError::OpenRestricted {
            path: "/dev/wskbd9".to_owned(),
            source: io::Error::from(Errno::NOENT),
        };
        assert_eq!(missing.negated_errno(), -Errno::NOENT.raw_os_error());
    }

    #[test]
    fn test_display() {
        let err: InputError = ContractViolation::CodeOutOfRange { code: 300, max: 255 }.into();
        assert_eq!(err.to_string(), "Code 300 is out of range (max 255)");
    }
}
