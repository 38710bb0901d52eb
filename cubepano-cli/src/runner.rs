//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, runtime creation and location
//! loading to reduce duplication across command handlers.

use std::path::Path;

use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;
use cubepano::config::{load_locations, Location};
use cubepano::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, defaults to debug-level logging unless RUST_LOG is set
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let logging_guard = init_logging(default_log_dir(), default_log_file(), debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self { logging_guard })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("cubepano v{}", cubepano::VERSION);
        info!("cubepano CLI: {} command", command);
    }

    /// Build the multi-threaded Tokio runtime the pipeline runs on.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }

    /// Load the location file, optionally keeping only one location.
    pub fn load_locations(
        &self,
        path: &Path,
        only: Option<&str>,
    ) -> Result<Vec<Location>, CliError> {
        let locations = load_locations(path)?;
        info!(
            "Loaded {} locations from {}",
            locations.len(),
            path.display()
        );
        select_locations(locations, only)
    }
}

/// Keeps only the location named `only`, if given.
pub fn select_locations(
    locations: Vec<Location>,
    only: Option<&str>,
) -> Result<Vec<Location>, CliError> {
    let Some(name) = only else {
        return Ok(locations);
    };

    let selected: Vec<Location> = locations
        .into_iter()
        .filter(|location| location.name == name)
        .collect();

    if selected.is_empty() {
        return Err(CliError::UnknownLocation(name.to_string()));
    }
    Ok(selected)
}
