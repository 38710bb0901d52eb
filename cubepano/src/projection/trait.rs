//! Projector trait for turning six cube faces into a panorama.

use image::RgbImage;
use std::sync::Arc;

use super::{CubeFaces, ProjectionError};

/// Maps six cube faces onto an equirectangular image.
///
/// Implementations are CPU-bound and are called from the blocking pool,
/// so they must be `Send + Sync`.
pub trait Projector: Send + Sync {
    /// Projects `faces` onto a `width × height` equirectangular image.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::EmptyOutput`] for a zero output size.
    fn project(
        &self,
        faces: &CubeFaces,
        height: u32,
        width: u32,
    ) -> Result<RgbImage, ProjectionError>;

    /// Human-readable projector name for logs.
    fn name(&self) -> &str;
}

impl<T: Projector + ?Sized> Projector for Arc<T> {
    fn project(
        &self,
        faces: &CubeFaces,
        height: u32,
        width: u32,
    ) -> Result<RgbImage, ProjectionError> {
        (**self).project(faces, height, width)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
