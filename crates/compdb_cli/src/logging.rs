//! Diagnostic logging setup.

use tracing::Level;

/// Chooses the log level from the global flags. `--quiet` wins over
/// `--verbose`.
pub fn level_for(quiet: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Installs the stderr log subscriber. Does nothing if one is already set.
pub fn init(quiet: bool, verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(quiet, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
