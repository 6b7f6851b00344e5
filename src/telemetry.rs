//! `tracing` subscriber setup for the binary.

use std::{fs::OpenOptions, io, panic, path::PathBuf, sync::Mutex};

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Subscriber setup failures.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter '{directive}': {source}")]
    Filter {
        /// Directive as configured.
        directive: String,
        /// Parser error.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// The log file could not be opened for appending.
    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        /// Log file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Maps `-v` counts onto a filter, falling back to the configured level.
pub fn filter_directive(config: &LoggingConfig, verbosity: u8) -> &str {
    match verbosity {
        0 => config.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over config and verbosity.
///
/// Returns `false` when a subscriber was already installed.
pub fn init(config: &LoggingConfig, verbosity: u8) -> Result<bool, TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = filter_directive(config, verbosity);
            EnvFilter::try_new(directive).map_err(|source| TelemetryError::Filter {
                directive: directive.to_string(),
                source,
            })?
        }
    };

    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| TelemetryError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(file_layer)
        .try_init()
        .is_ok();
    Ok(installed)
}

/// Sends panic reports to the debug log instead of raw stderr.
///
/// The dispatcher already reports a panicking operation as an error message,
/// so the interactive loop should not also print a backtrace banner.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        debug!(panic = %info, "panic caught");
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config_level() {
        let cfg = LoggingConfig::default();
        assert_eq!(filter_directive(&cfg, 0), "warn");
        assert_eq!(filter_directive(&cfg, 2), "debug");
        assert_eq!(filter_directive(&cfg, 9), "trace");
    }

    #[test]
    fn quiet_hook_still_unwinds() {
        install_panic_hook();
        let caught = panic::catch_unwind(|| panic!("boom"));
        let _ = panic::take_hook();
        assert!(caught.is_err());
    }
}
