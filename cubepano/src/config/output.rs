//! Output and working-directory configuration.

use std::path::{Path, PathBuf};

use super::defaults::{
    DEFAULT_FACE_QUALITY, DEFAULT_OUTPUT_DIR, DEFAULT_PANORAMA_QUALITY, DEFAULT_TEMP_DIR,
};

/// Where panoramas, face images and cached tiles are written.
///
/// # Directory Structure
///
/// ```text
/// {output_root}/{location}/{pano_id}.jpg          final panorama
/// {output_root}/{location}/{pano_id}/{face}.jpg   assembled faces (transient)
/// {temp_root}/{pano_id}/{face}/{level}_{x}_{y}.jpg cached tiles (transient)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    output_root: PathBuf,
    temp_root: PathBuf,
    face_quality: u8,
    panorama_quality: u8,
}

impl OutputConfig {
    /// Create an output configuration with default directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root directory for finished panoramas.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Set the root directory for the transient tile cache.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    /// Set the JPEG quality of face images (clamped to 1..=100).
    pub fn with_face_quality(mut self, quality: u8) -> Self {
        self.face_quality = quality.clamp(1, 100);
        self
    }

    /// Set the JPEG quality of the final panorama (clamped to 1..=100).
    pub fn with_panorama_quality(mut self, quality: u8) -> Self {
        self.panorama_quality = quality.clamp(1, 100);
        self
    }

    /// Root directory for finished panoramas.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Root directory for the transient tile cache.
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// JPEG quality of face images.
    pub fn face_quality(&self) -> u8 {
        self.face_quality
    }

    /// JPEG quality of the final panorama.
    pub fn panorama_quality(&self) -> u8 {
        self.panorama_quality
    }

    /// Directory holding the assembled faces of one panorama.
    pub fn face_dir(&self, location: &str, pano_id: &str) -> PathBuf {
        self.output_root.join(location).join(pano_id)
    }

    /// Path of the finished equirectangular panorama.
    pub fn panorama_path(&self, location: &str, pano_id: &str) -> PathBuf {
        self.output_root
            .join(location)
            .join(format!("{}.jpg", pano_id))
    }

    /// Tile cache directory of one panorama.
    pub fn tile_cache_dir(&self, pano_id: &str) -> PathBuf {
        self.temp_root.join(pano_id)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            temp_root: PathBuf::from(DEFAULT_TEMP_DIR),
            face_quality: DEFAULT_FACE_QUALITY,
            panorama_quality: DEFAULT_PANORAMA_QUALITY,
        }
    }
}
