//! Default values for configuration settings.

// =============================================================================
// Network
// =============================================================================

/// Timeout for HEAD existence probes, in seconds.
pub const DEFAULT_HEAD_TIMEOUT_SECS: u64 = 5;

/// Timeout for GET tile downloads, in seconds.
pub const DEFAULT_GET_TIMEOUT_SECS: u64 = 10;

/// Maximum number of indices probed along each grid axis.
pub const DEFAULT_MAX_PROBE: u32 = 10;

/// Maximum concurrent HTTP requests across a whole panorama.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 16;

/// Maximum tiles of one face being resolved at the same time.
pub const DEFAULT_MAX_CONCURRENT_TILES: usize = 16;

// =============================================================================
// Pyramid
// =============================================================================

/// Pyramid level assembled by default.
pub const DEFAULT_LEVEL: u8 = 0;

// =============================================================================
// Filesystem
// =============================================================================

/// Location file read by the CLI when none is given.
pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Root directory for finished panoramas.
pub const DEFAULT_OUTPUT_DIR: &str = "panoramas";

/// Root directory for the transient tile cache.
pub const DEFAULT_TEMP_DIR: &str = "temp_tiles";

/// JPEG quality of the intermediate face images.
pub const DEFAULT_FACE_QUALITY: u8 = 95;

/// JPEG quality of the final equirectangular panorama.
pub const DEFAULT_PANORAMA_QUALITY: u8 = 100;
