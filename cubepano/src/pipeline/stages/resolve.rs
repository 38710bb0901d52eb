//! Resolve stage - produces the image of one tile, falling back to coarser
//! pyramid levels when the tile itself is unavailable.
//!
//! A tile at level `L` that cannot be fetched is rebuilt from its ancestor at
//! `L-1`, then `L-2`, down to level 0. The ancestor is itself resolved the
//! same way, so the recursion depth is bounded by `L`. The covering square of
//! the ancestor is cropped and upscaled back to `TILE_SIZE`.
//!
//! ```text
//! level 1, (1,1) missing          level 0, (0,0)
//! ┌────┬────┐                     ┌────┬────┐
//! │    │    │   crop 256x256 at   │    │    │
//! ├────┼────┤ ◄── (256,256) and ──┤    │ ▓▓ │
//! │    │ ?? │   upscale to 512    │    │ ▓▓ │
//! └────┴────┘                     └────┴────┘
//! ```

use futures::future::{BoxFuture, FutureExt};
use image::imageops::{self, FilterType};
use image::RgbImage;
use tokio::task::spawn_blocking;
use tracing::{debug, trace, warn};

use super::fetch::fetch_tile;
use crate::cache::TileStore;
use crate::coord::{AncestorRegion, TileCoord, TILE_SIZE};
use crate::pipeline::PanoramaContext;
use crate::provider::AsyncTileProvider;

/// Resolves a tile, substituting an upscaled region of an ancestor when the
/// tile is unavailable.
///
/// Returns `None` when neither the tile nor any ancestor down to level 0
/// could be fetched and decoded. Fallback results are always
/// `TILE_SIZE × TILE_SIZE`; directly fetched tiles keep their own size.
pub fn resolve_tile<'a, P, S>(
    ctx: &'a PanoramaContext<P, S>,
    coord: TileCoord,
) -> BoxFuture<'a, Option<RgbImage>>
where
    P: AsyncTileProvider + 'static,
    S: TileStore + 'static,
{
    async move {
        if let Some(tile) = fetch_and_decode(ctx, coord).await {
            return Some(tile);
        }

        for fallback_level in (0..coord.level).rev() {
            let region = coord.region_in_ancestor(fallback_level);
            if let Some(ancestor) = resolve_tile(ctx, region.ancestor).await {
                debug!(
                    tile = %coord,
                    ancestor = %region.ancestor,
                    scale = region.scale,
                    "Tile rebuilt from coarser level"
                );
                return upscale_region(ancestor, region).await;
            }
        }

        trace!(tile = %coord, "No level could supply tile");
        None
    }
    .boxed()
}

/// Fetches a tile into the store and decodes it.
async fn fetch_and_decode<P, S>(ctx: &PanoramaContext<P, S>, coord: TileCoord) -> Option<RgbImage>
where
    P: AsyncTileProvider,
    S: TileStore,
{
    if !fetch_tile(ctx, coord).await {
        return None;
    }

    let bytes = ctx.store.read(&coord).await?;

    match spawn_blocking(move || decode_tile(&bytes)).await {
        Ok(Ok(tile)) => Some(tile),
        Ok(Err(e)) => {
            warn!(tile = %coord, error = %e, "Undecodable tile");
            None
        }
        Err(e) => {
            warn!(tile = %coord, error = %e, "Decode task failed");
            None
        }
    }
}

/// Decodes encoded tile bytes (JPEG in production) to RGB.
pub(crate) fn decode_tile(bytes: &[u8]) -> Result<RgbImage, image::ImageError> {
    image::load_from_memory(bytes).map(|img| img.to_rgb8())
}

async fn upscale_region(ancestor: RgbImage, region: AncestorRegion) -> Option<RgbImage> {
    match spawn_blocking(move || crop_and_upscale(&ancestor, &region)).await {
        Ok(tile) => Some(tile),
        Err(e) => {
            warn!(error = %e, "Upscale task failed");
            None
        }
    }
}

/// Crops `region` out of the ancestor and resizes it to a full tile.
///
/// The crop window is always `region.size` square. Parts of it outside the
/// ancestor (undersized edge tiles) stay black, so the upscale factor is
/// exactly the level scale.
pub(crate) fn crop_and_upscale(ancestor: &RgbImage, region: &AncestorRegion) -> RgbImage {
    let mut window = RgbImage::new(region.size, region.size);
    if region.x < ancestor.width() && region.y < ancestor.height() {
        let cropped =
            imageops::crop_imm(ancestor, region.x, region.y, region.size, region.size).to_image();
        imageops::replace(&mut window, &cropped, 0, 0);
    }

    imageops::resize(&window, TILE_SIZE, TILE_SIZE, FilterType::Lanczos3)
}
