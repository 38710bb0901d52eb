//! Encode stage - reads and writes the JPEG images of the pipeline.
//!
//! JPEG encoding and decoding are CPU-bound and run on the blocking pool.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageError, RgbImage};
use tokio::task::spawn_blocking;
use tracing::{debug, instrument};

use crate::pipeline::PipelineError;

/// Encodes `image` as JPEG at `path`, creating parent directories.
///
/// The image is handed back so callers can keep using it.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub async fn save_jpeg(
    image: RgbImage,
    path: PathBuf,
    quality: u8,
) -> Result<RgbImage, PipelineError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PipelineError::io(parent, e))?;
    }

    let image = spawn_blocking(move || {
        write_jpeg(&image, &path, quality)
            .map_err(|source| PipelineError::Save { path, source })
            .map(|()| image)
    })
    .await??;

    debug!(quality, "JPEG written");
    Ok(image)
}

fn write_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<(), ImageError> {
    let file = File::create(path)?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )
}

/// Loads an image file as RGB.
pub async fn load_rgb(path: PathBuf) -> Result<RgbImage, PipelineError> {
    spawn_blocking(move || match image::open(&path) {
        Ok(img) => Ok(img.to_rgb8()),
        Err(source) => Err(PipelineError::FaceDecode { path, source }),
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[tokio::test]
    async fn test_save_creates_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("loc").join("pano").join("f.jpg");
        let image = RgbImage::from_pixel(64, 32, Rgb([200, 100, 50]));

        let returned = save_jpeg(image, path.clone(), 95).await.unwrap();

        assert_eq!(returned.dimensions(), (64, 32));
        assert!(path.exists());

        let loaded = load_rgb(path).await.unwrap();
        assert_eq!(loaded.dimensions(), (64, 32));
        let pixel = loaded.get_pixel(10, 10).0;
        assert!(pixel[0].abs_diff(200) <= 4);
        assert!(pixel[1].abs_diff(100) <= 4);
        assert!(pixel[2].abs_diff(50) <= 4);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_decode_error() {
        let temp_dir = tempfile::tempdir().unwrap();

        let err = load_rgb(temp_dir.path().join("nope.jpg")).await.unwrap_err();

        assert!(matches!(err, PipelineError::FaceDecode { .. }));
    }
}
