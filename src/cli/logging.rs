//! Diagnostic output on stderr.
use std::io;

use tracing::Level;

/// Maps the number of `-v` flags to a maximum log level.
pub(super) const fn level_for(verbosity: u8) -> Level
{
    match verbosity
    {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub(super) fn init(verbosity: u8)
{
    // Err only means a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
