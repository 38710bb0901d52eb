//! Probe stage - discovers the tile grid of a face.
//!
//! Tile servers publish no manifest, so the grid is found by asking for
//! tiles along the first row and the first column until one is missing.
//! The two scans are independent and run concurrently; the grid is assumed
//! to be the rectangle they span.

use crate::cache::TileStore;
use crate::coord::{Face, GridExtent, TileCoord};
use crate::pipeline::PanoramaContext;
use crate::provider::AsyncTileProvider;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy)]
enum Axis {
    /// Along row 0: `(i, 0)`
    Columns,
    /// Along column 0: `(0, i)`
    Rows,
}

/// Finds the highest column and row index present for `face` at `level`.
///
/// Each axis is scanned from index 0 and stops at the first miss or after
/// `max_probe` hits. An axis with no tile at index 0 yields `-1`.
#[instrument(skip(ctx), fields(pano = %ctx.pano_id()))]
pub async fn probe_grid<P, S>(ctx: &PanoramaContext<P, S>, face: Face, level: u8) -> GridExtent
where
    P: AsyncTileProvider,
    S: TileStore,
{
    let (max_x, max_y) = tokio::join!(
        scan_axis(ctx, face, level, Axis::Columns),
        scan_axis(ctx, face, level, Axis::Rows),
    );

    let extent = GridExtent::new(max_x, max_y);
    debug!(face = %face, level, max_x, max_y, "Probe complete");
    extent
}

async fn scan_axis<P, S>(ctx: &PanoramaContext<P, S>, face: Face, level: u8, axis: Axis) -> i32
where
    P: AsyncTileProvider,
    S: TileStore,
{
    let mut last = -1;

    for i in 0..ctx.config.download.max_probe() {
        let coord = match axis {
            Axis::Columns => TileCoord::new(face, level, i, 0),
            Axis::Rows => TileCoord::new(face, level, 0, i),
        };

        let found = match ctx.http_limiter.acquire().await {
            Ok(_permit) => ctx.provider.exists(&coord).await,
            Err(_) => false,
        };

        if !found {
            break;
        }
        last = i as i32;
    }

    last
}
