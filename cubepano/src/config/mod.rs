//! Configuration types for cubepano components.
//!
//! - [`DownloadConfig`] - probe/download timeouts and concurrency limits
//! - [`OutputConfig`] - output, face and tile-cache directories
//! - [`Location`] - one tile server and its panoramas, loaded from JSON
//!
//! # Example
//!
//! ```
//! use cubepano::config::{DownloadConfig, OutputConfig};
//!
//! let download = DownloadConfig::default().with_max_probe(16);
//! let output = OutputConfig::default().with_output_root("/srv/panoramas");
//! assert_eq!(download.max_probe(), 16);
//! ```

pub mod defaults;
mod download;
mod locations;
mod output;

pub use defaults::*;
pub use download::DownloadConfig;
pub use locations::{
    ensure_slash, load_locations, parse_locations, version_suffix, Location, LocationError,
};
pub use output::OutputConfig;
