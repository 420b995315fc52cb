// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

/// Installs a global [`tracing_subscriber::fmt`] subscriber that writes to stderr. The
/// default [`LogHandler`] forwards to [`tracing`], so this is all an application needs
/// to see the library's diagnostics.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// [`LogHandler`]: crate::LogHandler
pub fn try_initialize_tracing(level: LevelFilter) -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| miette::miette!("Failed to install tracing subscriber: {err}"))
}
