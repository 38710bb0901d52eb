//! Download and probing configuration.

use std::time::Duration;

use super::defaults::{
    DEFAULT_GET_TIMEOUT_SECS, DEFAULT_HEAD_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_REQUESTS,
    DEFAULT_MAX_CONCURRENT_TILES, DEFAULT_MAX_PROBE,
};

/// Configuration for tile probing and downloading.
///
/// Groups the network parameters shared by the grid prober and the tile
/// fetcher, with defaults matching common tile servers.
///
/// # Example
///
/// ```
/// use cubepano::config::DownloadConfig;
///
/// let config = DownloadConfig::default();
/// assert_eq!(config.head_timeout_secs(), 5);
/// assert_eq!(config.get_timeout_secs(), 10);
/// assert_eq!(config.max_probe(), 10);
///
/// let config = DownloadConfig::new()
///     .with_get_timeout_secs(30)
///     .with_max_concurrent_requests(4);
/// assert_eq!(config.max_concurrent_requests(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Timeout for HEAD existence checks (in seconds)
    head_timeout_secs: u64,
    /// Timeout for GET downloads (in seconds)
    get_timeout_secs: u64,
    /// Number of indices probed along each axis
    max_probe: u32,
    /// Maximum concurrent HTTP requests
    max_concurrent_requests: usize,
    /// Maximum tiles resolved concurrently per face
    max_concurrent_tiles: usize,
}

impl DownloadConfig {
    /// Create a new download configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HEAD probe timeout in seconds. Default: 5 seconds.
    pub fn with_head_timeout_secs(mut self, timeout: u64) -> Self {
        self.head_timeout_secs = timeout;
        self
    }

    /// Set the GET download timeout in seconds. Default: 10 seconds.
    pub fn with_get_timeout_secs(mut self, timeout: u64) -> Self {
        self.get_timeout_secs = timeout;
        self
    }

    /// Set how many indices are probed along each grid axis.
    ///
    /// Grids wider or taller than this are truncated. Default: 10.
    pub fn with_max_probe(mut self, max_probe: u32) -> Self {
        self.max_probe = max_probe;
        self
    }

    /// Set the maximum number of concurrent HTTP requests (minimum 1).
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit.max(1);
        self
    }

    /// Set how many tiles of one face are resolved at once (minimum 1).
    pub fn with_max_concurrent_tiles(mut self, limit: usize) -> Self {
        self.max_concurrent_tiles = limit.max(1);
        self
    }

    /// Get the HEAD probe timeout in seconds.
    pub fn head_timeout_secs(&self) -> u64 {
        self.head_timeout_secs
    }

    /// Get the GET download timeout in seconds.
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_timeout_secs
    }

    /// HEAD probe timeout as a `Duration`.
    pub fn head_timeout(&self) -> Duration {
        Duration::from_secs(self.head_timeout_secs)
    }

    /// GET download timeout as a `Duration`.
    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.get_timeout_secs)
    }

    /// Get the per-axis probe limit.
    pub fn max_probe(&self) -> u32 {
        self.max_probe
    }

    /// Get the maximum number of concurrent HTTP requests.
    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    /// Get the maximum number of tiles resolved concurrently per face.
    pub fn max_concurrent_tiles(&self) -> usize {
        self.max_concurrent_tiles
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            head_timeout_secs: DEFAULT_HEAD_TIMEOUT_SECS,
            get_timeout_secs: DEFAULT_GET_TIMEOUT_SECS,
            max_probe: DEFAULT_MAX_PROBE,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_concurrent_tiles: DEFAULT_MAX_CONCURRENT_TILES,
        }
    }
}
