//! Fetch stage - brings one tile into the tile store.
//!
//! Order of checks for a coordinate:
//!
//! 1. Known miss for this panorama → `false`, no request
//! 2. Already in the store → `true`, no request
//! 3. GET from the provider (bounded by the HTTP limiter) → stored on 200
//!
//! Steps 2 and 3 run under the per-tile lock of the [`FetchCoalescer`], so
//! concurrent callers for the same tile issue at most one request.
//!
//! [`FetchCoalescer`]: crate::pipeline::FetchCoalescer

use crate::cache::TileStore;
use crate::coord::TileCoord;
use crate::pipeline::PanoramaContext;
use crate::provider::AsyncTileProvider;
use tracing::{debug, trace, warn};

/// Ensures a tile is in the store.
///
/// Returns `true` when the tile is available afterwards. Download failures,
/// timeouts and non-200 answers are logged and reported as `false`; they
/// are remembered, so the tile is not requested again for this panorama.
pub async fn fetch_tile<P, S>(ctx: &PanoramaContext<P, S>, coord: TileCoord) -> bool
where
    P: AsyncTileProvider,
    S: TileStore,
{
    if ctx.coalescer.is_missing(&coord) {
        return false;
    }

    let _guard = ctx.coalescer.lock(coord).await;

    if ctx.store.contains(&coord).await {
        ctx.coalescer.record_hit();
        trace!(tile = %coord, "Tile store hit");
        return true;
    }

    // Another task may have failed this tile while we waited for the lock
    if ctx.coalescer.is_missing(&coord) {
        return false;
    }

    let result = {
        let _permit = match ctx.http_limiter.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                debug!(tile = %coord, "HTTP limiter closed");
                return false;
            }
        };
        ctx.coalescer.record_request();
        ctx.provider.download(&coord).await
    };

    match result {
        Ok(data) => match ctx.store.write(&coord, data).await {
            Ok(()) => {
                trace!(tile = %coord, "Tile downloaded");
                true
            }
            Err(e) => {
                warn!(tile = %coord, error = %e, "Failed to store tile");
                ctx.coalescer.mark_missing(coord);
                false
            }
        },
        Err(e) => {
            debug!(tile = %coord, error = %e, "Tile download failed");
            ctx.coalescer.mark_missing(coord);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Face;
    use crate::pipeline::stages::test_support::{context, solid_tile, tile_url};
    use crate::provider::MockTileServer;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fetch_stores_tile() {
        let url = tile_url(Face::Front, 0, 0, 0);
        let server = MockTileServer::new().with_tile(&url, vec![1, 2, 3]);
        let ctx = context(server.clone());
        let coord = TileCoord::new(Face::Front, 0, 0, 0);

        assert!(fetch_tile(&ctx, coord).await);
        assert_eq!(ctx.store.read(&coord).await, Some(vec![1, 2, 3]));
        assert_eq!(server.get_count(&url), 1);
    }

    #[tokio::test]
    async fn test_second_fetch_hits_store() {
        let url = tile_url(Face::Back, 0, 1, 0);
        let server = MockTileServer::new().with_tile(&url, solid_tile([0, 0, 0]));
        let ctx = context(server.clone());
        let coord = TileCoord::new(Face::Back, 0, 1, 0);

        assert!(fetch_tile(&ctx, coord).await);
        assert!(fetch_tile(&ctx, coord).await);

        assert_eq!(server.get_count(&url), 1);
        let stats = ctx.coalescer.stats();
        assert_eq!(stats.network_requests, 1);
        assert_eq!(stats.cache_hits, 1);
    }

    #[tokio::test]
    async fn test_missing_tile_is_not_requested_twice() {
        let server = MockTileServer::new();
        let ctx = context(server.clone());
        let coord = TileCoord::new(Face::Left, 1, 3, 3);

        assert!(!fetch_tile(&ctx, coord).await);
        assert!(!fetch_tile(&ctx, coord).await);

        assert_eq!(server.get_count(&tile_url(Face::Left, 1, 3, 3)), 1);
        assert!(ctx.coalescer.is_missing(&coord));
    }

    #[tokio::test]
    async fn test_transport_error_is_failure() {
        let url = tile_url(Face::Up, 0, 0, 0);
        let server = MockTileServer::new()
            .with_tile(&url, vec![1])
            .with_broken(&url);
        let ctx = context(server);

        assert!(!fetch_tile(&ctx, TileCoord::new(Face::Up, 0, 0, 0)).await);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_issue_one_request() {
        let url = tile_url(Face::Right, 0, 0, 0);
        let server = MockTileServer::new()
            .with_tile(&url, vec![5])
            .with_delay(Duration::from_millis(20));
        let ctx = Arc::new(context(server.clone()));
        let coord = TileCoord::new(Face::Right, 0, 0, 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move { fetch_tile(&ctx, coord).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(server.get_count(&url), 1);
        assert_eq!(ctx.coalescer.stats().network_requests, 1);
    }
}
