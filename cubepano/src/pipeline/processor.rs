//! Panorama processor - drives one panorama through all stages.
//!
//! ```text
//! Face::ALL → Assembly (probe, resolve, paste, save) → Load faces → Project → Save → Cleanup
//! ```
//!
//! Faces that the server does not have are skipped; a face missing on disk
//! when the projector needs it aborts this panorama. Cleanup runs whatever
//! the outcome.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbImage;
use tokio::task::spawn_blocking;
use tracing::{debug, instrument};

use crate::cache::TileStore;
use crate::coord::{Face, GridExtent};
use crate::log::Logger;
use crate::pipeline::stages::{assemble_face, face_path, load_rgb, probe_grid, save_jpeg};
use crate::pipeline::{PanoramaContext, PipelineError};
use crate::projection::{CubeFaces, Projector};
use crate::provider::AsyncTileProvider;
use crate::{log_info, log_warn};

/// What happened to a panorama that was processed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanoramaOutcome {
    /// The equirectangular image was written to `path`.
    Projected {
        path: PathBuf,
        /// Edge length every face was projected at
        face_size: u32,
        /// Faces the server supplied tiles for
        faces: Vec<Face>,
    },
    /// No face had any tile; nothing was projected.
    NoFaces,
}

/// Processes one panorama of `location`.
///
/// Assembles the six faces into the face directory, projects them and saves
/// the panorama to `{output_root}/{location}/{pano_id}.jpg`. The face
/// directory, the tile store and the temp root are removed afterwards, also
/// when processing failed.
#[instrument(skip(ctx, projector), fields(pano = %ctx.pano_id()))]
pub async fn process_panorama<P, S, R>(
    ctx: &PanoramaContext<P, S>,
    projector: Arc<R>,
    location: &str,
) -> Result<PanoramaOutcome, PipelineError>
where
    P: AsyncTileProvider + 'static,
    S: TileStore + 'static,
    R: Projector + 'static,
{
    let face_dir = ctx.config.output.face_dir(location, ctx.pano_id());
    log_info!(
        ctx.logger,
        "Processing panorama {} ({})",
        ctx.pano_id(),
        location
    );

    let result = build_panorama(ctx, projector, location, &face_dir).await;

    ctx.coalescer.log_stats(ctx.pano_id());
    cleanup(ctx, &face_dir).await;

    result
}

async fn build_panorama<P, S, R>(
    ctx: &PanoramaContext<P, S>,
    projector: Arc<R>,
    location: &str,
    face_dir: &Path,
) -> Result<PanoramaOutcome, PipelineError>
where
    P: AsyncTileProvider + 'static,
    S: TileStore + 'static,
    R: Projector + 'static,
{
    let mut face_size = None;
    let mut faces = Vec::with_capacity(Face::ALL.len());

    for face in Face::ALL {
        if let Some(assembled) = assemble_face(ctx, face, face_dir).await? {
            face_size.get_or_insert(assembled.image.width());
            faces.push(face);
        }
    }

    let Some(face_size) = face_size else {
        log_warn!(ctx.logger, "No faces found for panorama {}", ctx.pano_id());
        return Ok(PanoramaOutcome::NoFaces);
    };

    let cube = load_faces(face_dir, face_size).await?;
    let (height, width) = (face_size * 2, face_size * 4);
    log_info!(
        ctx.logger,
        "Projecting {} faces at {}px -> {}x{} ({})",
        faces.len(),
        face_size,
        width,
        height,
        projector.name()
    );

    let panorama = spawn_blocking(move || projector.project(&cube, height, width)).await??;

    let path = ctx.config.output.panorama_path(location, ctx.pano_id());
    save_jpeg(panorama, path.clone(), ctx.config.output.panorama_quality()).await?;
    log_info!(ctx.logger, "Saved panorama: {}", path.display());

    Ok(PanoramaOutcome::Projected {
        path,
        face_size,
        faces,
    })
}

/// Loads all six face files, resampling each to `face_size` square.
async fn load_faces(face_dir: &Path, face_size: u32) -> Result<CubeFaces, PipelineError> {
    let mut images: [RgbImage; 6] = Default::default();

    for face in Face::ALL {
        let path = face_path(face_dir, face);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(PipelineError::MissingFace { face, path });
        }

        let image = load_rgb(path).await?;
        images[face.index()] = if image.dimensions() == (face_size, face_size) {
            image
        } else {
            debug!(face = %face, from = ?image.dimensions(), to = face_size, "Resampling face");
            spawn_blocking(move || {
                imageops::resize(&image, face_size, face_size, FilterType::Lanczos3)
            })
            .await?
        };
    }

    Ok(CubeFaces::new(images)?)
}

/// Best-effort removal of everything transient for this panorama.
async fn cleanup<P, S>(ctx: &PanoramaContext<P, S>, face_dir: &Path)
where
    P: AsyncTileProvider,
    S: TileStore,
{
    if let Err(e) = tokio::fs::remove_dir_all(face_dir).await {
        debug!(path = %face_dir.display(), error = %e, "Face directory not removed");
    }
    if let Err(e) = ctx.store.purge().await {
        debug!(error = %e, "Tile store not purged");
    }
    let temp_root = ctx.config.output.temp_root();
    if let Err(e) = tokio::fs::remove_dir_all(temp_root).await {
        debug!(path = %temp_root.display(), error = %e, "Temp root not removed");
    }

    log_info!(ctx.logger, "Cleaned up pano folder and temp tiles");
}

/// Probes the grid of every face at the configured level.
pub async fn probe_faces<P, S>(ctx: &PanoramaContext<P, S>) -> Vec<(Face, GridExtent)>
where
    P: AsyncTileProvider,
    S: TileStore,
{
    let mut extents = Vec::with_capacity(Face::ALL.len());
    for face in Face::ALL {
        extents.push((face, probe_grid(ctx, face, ctx.config.level).await));
    }
    extents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use crate::log::MemoryLogger;
    use crate::pipeline::stages::test_support::{context_with, solid_tile, tile_url};
    use crate::pipeline::PipelineConfig;
    use crate::projection::ProjectionError;
    use crate::provider::MockTileServer;
    use std::sync::Mutex;

    /// Records the requested output size and returns a gray image.
    #[derive(Default)]
    struct RecordingProjector {
        calls: Mutex<Vec<(u32, u32, u32)>>,
    }

    impl Projector for RecordingProjector {
        fn project(
            &self,
            faces: &CubeFaces,
            height: u32,
            width: u32,
        ) -> Result<RgbImage, ProjectionError> {
            self.calls
                .lock()
                .unwrap()
                .push((faces.face_size(), height, width));
            Ok(RgbImage::from_pixel(width, height, image::Rgb([128, 128, 128])))
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn config_in(root: &Path) -> PipelineConfig {
        let output = OutputConfig::new()
            .with_output_root(root.join("out"))
            .with_temp_root(root.join("temp"));
        PipelineConfig {
            output,
            ..PipelineConfig::default()
        }
    }

    fn server_with_faces(faces: &[Face]) -> MockTileServer {
        faces.iter().fold(MockTileServer::new(), |server, face| {
            server.with_tile(tile_url(*face, 0, 0, 0), solid_tile([60, 120, 180]))
        })
    }

    #[tokio::test]
    async fn test_six_faces_projected_at_double_size() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = context_with(
            server_with_faces(&Face::ALL),
            config_in(temp_dir.path()),
            Arc::new(MemoryLogger::new()),
        );
        let projector = Arc::new(RecordingProjector::default());

        let outcome = process_panorama(&ctx, Arc::clone(&projector), "museum")
            .await
            .unwrap();

        assert_eq!(*projector.calls.lock().unwrap(), vec![(512, 1024, 2048)]);
        let path = temp_dir.path().join("out").join("museum").join("pano.jpg");
        assert_eq!(
            outcome,
            PanoramaOutcome::Projected {
                path: path.clone(),
                face_size: 512,
                faces: Face::ALL.to_vec(),
            }
        );
        assert_eq!(image::open(&path).unwrap().into_rgb8().dimensions(), (2048, 1024));
    }

    #[tokio::test]
    async fn test_cleanup_after_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("temp").join("other")).unwrap();
        let logger = Arc::new(MemoryLogger::new());
        let ctx = context_with(
            server_with_faces(&Face::ALL),
            config_in(temp_dir.path()),
            logger.clone(),
        );

        process_panorama(&ctx, Arc::new(RecordingProjector::default()), "museum")
            .await
            .unwrap();

        assert!(!temp_dir.path().join("out").join("museum").join("pano").exists());
        assert!(!temp_dir.path().join("temp").exists());
        assert!(ctx.store.is_empty());
        assert!(logger.contains("Cleaned up pano folder and temp tiles"));
    }

    #[tokio::test]
    async fn test_absent_face_fails_at_projection() {
        let temp_dir = tempfile::tempdir().unwrap();
        let without_up = [Face::Front, Face::Back, Face::Left, Face::Right, Face::Down];
        let logger = Arc::new(MemoryLogger::new());
        let ctx = context_with(
            server_with_faces(&without_up),
            config_in(temp_dir.path()),
            logger.clone(),
        );
        let projector = Arc::new(RecordingProjector::default());

        let err = process_panorama(&ctx, Arc::clone(&projector), "museum")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::MissingFace { face: Face::Up, .. }));
        assert!(projector.calls.lock().unwrap().is_empty());
        assert!(logger.warnings().contains(&"Face u: no tiles found".to_string()));
        // Cleanup also runs on failure
        assert!(!temp_dir.path().join("out").join("museum").join("pano").exists());
        assert!(logger.contains("Cleaned up pano folder and temp tiles"));
    }

    #[tokio::test]
    async fn test_no_faces() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = context_with(
            MockTileServer::new(),
            config_in(temp_dir.path()),
            Arc::new(MemoryLogger::new()),
        );
        let projector = Arc::new(RecordingProjector::default());

        let outcome = process_panorama(&ctx, Arc::clone(&projector), "museum")
            .await
            .unwrap();

        assert_eq!(outcome, PanoramaOutcome::NoFaces);
        assert!(projector.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_faces_resampled_to_first_face_size() {
        let temp_dir = tempfile::tempdir().unwrap();
        let face_dir = temp_dir.path().join("faces");
        std::fs::create_dir_all(&face_dir).unwrap();
        for face in Face::ALL {
            let size = if face == Face::Left { 32 } else { 16 };
            RgbImage::new(size, size)
                .save(face_path(&face_dir, face))
                .unwrap();
        }

        let faces = load_faces(&face_dir, 16).await.unwrap();

        assert_eq!(faces.face_size(), 16);
        assert_eq!(faces.face(Face::Left).dimensions(), (16, 16));
    }

    #[tokio::test]
    async fn test_probe_faces_reports_every_face() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = context_with(
            server_with_faces(&[Face::Front, Face::Down]),
            config_in(temp_dir.path()),
            Arc::new(MemoryLogger::new()),
        );

        let extents = probe_faces(&ctx).await;

        assert_eq!(extents.len(), 6);
        assert_eq!(extents[0], (Face::Front, GridExtent::new(0, 0)));
        assert_eq!(extents[4], (Face::Up, GridExtent::EMPTY));
        assert_eq!(extents[5], (Face::Down, GridExtent::new(0, 0)));
    }
}
