//! Logger initialization.

use crate::cli::LogLevel;

/// Initialize the logger with the level chosen on the command line.
pub fn init_logger(level: LogLevel) {
    env_logger::Builder::from_default_env()
        .filter_level(level.into())
        .init();
}
