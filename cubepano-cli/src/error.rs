//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use cubepano::config::LocationError;
use cubepano::inventory::InventoryError;
use cubepano::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Location file could not be loaded
    Locations(LocationError),
    /// No location with the requested name
    UnknownLocation(String),
    /// Failed to create the HTTP client
    HttpClient(ProviderError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Inventory scan failed
    Inventory(InventoryError),
    /// Some panoramas could not be produced
    PanoramasFailed { failed: usize, total: usize },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Locations(LocationError::MissingBaseUrl { .. })
            | CliError::Locations(LocationError::Parse(_)) => {
                eprintln!();
                eprintln!("The location file must be a JSON list of locations, or");
                eprintln!("an object with a \"locations\" list. Each location needs:");
                eprintln!("  baseUrl     tile server root (or \"baseurl\")");
                eprintln!("  panoramas   list of panorama ids");
                eprintln!("  name        optional, defaults to loc<index>");
                eprintln!("  version     optional, appended as ?v=<version>");
            }
            CliError::PanoramasFailed { .. } => {
                eprintln!();
                eprintln!("See the log file for the reason of each failure.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Locations(e) => write!(f, "{}", e),
            CliError::UnknownLocation(name) => {
                write!(f, "No location named '{}' in the location file", name)
            }
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Inventory(e) => write!(f, "{}", e),
            CliError::PanoramasFailed { failed, total } => {
                write!(f, "{} of {} panoramas failed", failed, total)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Locations(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Inventory(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LocationError> for CliError {
    fn from(e: LocationError) -> Self {
        CliError::Locations(e)
    }
}

impl From<InventoryError> for CliError {
    fn from(e: InventoryError) -> Self {
        CliError::Inventory(e)
    }
}
