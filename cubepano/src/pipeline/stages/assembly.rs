//! Assembly stage - builds the image of one cube face.
//!
//! The face grid is probed, every cell is resolved concurrently, and the
//! tiles are composited on a black canvas. Tile `(x, y)` is pasted at pixel
//! offset `(y * TILE_SIZE, x * TILE_SIZE)`: the tile server's `x` runs down
//! the face and `y` runs across it. Pastes are clipped to the canvas, so on
//! non-square grids tiles that fall outside are dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops;
use image::RgbImage;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use super::encode::save_jpeg;
use super::probe::probe_grid;
use super::resolve::resolve_tile;
use crate::cache::TileStore;
use crate::coord::{Face, GridExtent, TileCoord, TILE_SIZE};
use crate::log::Logger;
use crate::pipeline::{PanoramaContext, PipelineError};
use crate::provider::AsyncTileProvider;
use crate::{log_info, log_warn};

/// An assembled cube face.
#[derive(Debug, Clone)]
pub struct FaceImage {
    pub face: Face,
    /// Grid the face was built from
    pub extent: GridExtent,
    /// Composited pixels
    pub image: RgbImage,
    /// Where the face was saved
    pub path: PathBuf,
    /// Cells left black because no level could supply them
    pub missing_tiles: usize,
}

/// Path of a face image inside a face directory.
pub fn face_path(face_dir: &Path, face: Face) -> PathBuf {
    face_dir.join(format!("{}.jpg", face.token()))
}

/// Assembles one face and saves it to `{face_dir}/{face}.jpg`.
///
/// Returns `Ok(None)` when the server has no tiles for this face at the
/// configured level. Missing tiles leave black gaps and are logged.
#[instrument(skip(ctx, face_dir), fields(pano = %ctx.pano_id()))]
pub async fn assemble_face<P, S>(
    ctx: &PanoramaContext<P, S>,
    face: Face,
    face_dir: &Path,
) -> Result<Option<FaceImage>, PipelineError>
where
    P: AsyncTileProvider + 'static,
    S: TileStore + 'static,
{
    let level = ctx.config.level;
    let extent = probe_grid(ctx, face, level).await;

    if extent.is_empty() {
        log_warn!(ctx.logger, "Face {}: no tiles found", face);
        return Ok(None);
    }

    let (width, height) = extent.pixel_size();
    log_info!(
        ctx.logger,
        "Face {}: grid {} -> {}x{}px",
        face,
        extent,
        width,
        height
    );

    let mut canvas = RgbImage::new(width, height);
    let semaphore = Arc::new(Semaphore::new(ctx.config.download.max_concurrent_tiles()));
    let mut tiles = JoinSet::new();

    for (x, y) in extent.cells() {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| PipelineError::TaskPanicked(e.to_string()))?;
        let ctx = ctx.clone();

        tiles.spawn(async move {
            let _permit = permit;
            let coord = TileCoord::new(face, level, x, y);
            (coord, resolve_tile(&ctx, coord).await)
        });
    }

    let mut missing_tiles = 0;
    while let Some(joined) = tiles.join_next().await {
        match joined {
            Ok((coord, Some(tile))) => {
                paste_tile(&mut canvas, &tile, coord.x, coord.y);
            }
            Ok((coord, None)) => {
                missing_tiles += 1;
                log_warn!(
                    ctx.logger,
                    "Tile missing even after fallback: {} {}_{}",
                    face,
                    coord.x,
                    coord.y
                );
            }
            Err(e) => {
                missing_tiles += 1;
                warn!(face = %face, error = %e, "Tile task failed");
            }
        }
    }

    let path = face_path(face_dir, face);
    let image = save_jpeg(canvas, path.clone(), ctx.config.output.face_quality()).await?;

    debug!(face = %face, missing_tiles, "Face assembled");
    log_info!(ctx.logger, "Merged face {} -> {}", face, path.display());

    Ok(Some(FaceImage {
        face,
        extent,
        image,
        path,
        missing_tiles,
    }))
}

/// Pastes tile `(x, y)` with the axis swap, clipped to the canvas.
pub(crate) fn paste_tile(canvas: &mut RgbImage, tile: &RgbImage, x: u32, y: u32) {
    let left = i64::from(y) * i64::from(TILE_SIZE);
    let top = i64::from(x) * i64::from(TILE_SIZE);
    imageops::replace(canvas, tile, left, top);
}
