//! Fetch coalescing for tile downloads.
//!
//! The same tile can be requested several times while a panorama is built:
//! neighbouring cells fall back to the same ancestor, and the fallback loop
//! revisits coarser levels. The coalescer makes sure each destination is
//! fetched by at most one task at a time and remembers tiles the server did
//! not have, so a failed tile is never requested twice.
//!
//! ```text
//! resolve f/2/2_3 ─┐                        ┌─► [lock held] GET f/1/1_1
//!                  ├──► FetchCoalescer ─────┤
//! resolve f/2/3_3 ─┘     (per tile lock)    └─► [waits] store hit, no GET
//! ```

use crate::coord::TileCoord;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

/// Serializes fetches per tile and remembers definitive misses.
#[derive(Debug, Default)]
pub struct FetchCoalescer {
    /// Per-destination locks
    locks: DashMap<TileCoord, Arc<Mutex<()>>>,
    /// Tiles whose download failed for this panorama
    misses: DashSet<TileCoord>,
    network_requests: AtomicU64,
    cache_hits: AtomicU64,
    coalesced_waits: AtomicU64,
}

/// Snapshot of fetch statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// GET requests sent to the tile server
    pub network_requests: u64,
    /// Fetches answered from the tile store
    pub cache_hits: u64,
    /// Fetches that had to wait for another task on the same tile
    pub coalesced_waits: u64,
    /// Distinct tiles known to be unavailable
    pub misses: u64,
}

impl FetchCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock for `coord`, waiting while another task holds it.
    pub async fn lock(&self, coord: TileCoord) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(
            self.locks
                .entry(coord)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );

        match Arc::clone(&lock).try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                self.coalesced_waits.fetch_add(1, Ordering::Relaxed);
                debug!(tile = %coord, "Waiting for in-flight fetch");
                lock.lock_owned().await
            }
        }
    }

    /// Records that `coord` could not be fetched.
    pub fn mark_missing(&self, coord: TileCoord) {
        self.misses.insert(coord);
    }

    /// True if a previous fetch of `coord` failed.
    pub fn is_missing(&self, coord: &TileCoord) -> bool {
        self.misses.contains(coord)
    }

    pub(crate) fn record_request(&self) {
        self.network_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> FetchStats {
        FetchStats {
            network_requests: self.network_requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            coalesced_waits: self.coalesced_waits.load(Ordering::Relaxed),
            misses: self.misses.len() as u64,
        }
    }

    /// Logs current statistics.
    pub fn log_stats(&self, pano_id: &str) {
        let stats = self.stats();
        info!(
            pano = pano_id,
            requests = stats.network_requests,
            cache_hits = stats.cache_hits,
            coalesced = stats.coalesced_waits,
            misses = stats.misses,
            "Tile fetch statistics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Face;
    use std::time::Duration;

    fn tile(x: u32, y: u32) -> TileCoord {
        TileCoord::new(Face::Front, 1, x, y)
    }

    #[tokio::test]
    async fn test_first_lock_is_not_coalesced() {
        let coalescer = FetchCoalescer::new();

        let _guard = coalescer.lock(tile(0, 0)).await;

        assert_eq!(coalescer.stats().coalesced_waits, 0);
    }

    #[tokio::test]
    async fn test_different_tiles_do_not_block() {
        let coalescer = FetchCoalescer::new();

        let _a = coalescer.lock(tile(0, 0)).await;
        let _b = coalescer.lock(tile(0, 1)).await;

        assert_eq!(coalescer.stats().coalesced_waits, 0);
    }

    #[tokio::test]
    async fn test_second_lock_waits_for_first() {
        let coalescer = Arc::new(FetchCoalescer::new());
        let guard = coalescer.lock(tile(1, 1)).await;

        let waiter = {
            let coalescer = Arc::clone(&coalescer);
            tokio::spawn(async move {
                let _guard = coalescer.lock(tile(1, 1)).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert_eq!(coalescer.stats().coalesced_waits, 1);
    }

    #[test]
    fn test_misses_are_remembered() {
        let coalescer = FetchCoalescer::new();

        assert!(!coalescer.is_missing(&tile(2, 2)));
        coalescer.mark_missing(tile(2, 2));
        coalescer.mark_missing(tile(2, 2));

        assert!(coalescer.is_missing(&tile(2, 2)));
        assert!(!coalescer.is_missing(&tile(2, 3)));
        assert_eq!(coalescer.stats().misses, 1);
    }

    #[test]
    fn test_counters() {
        let coalescer = FetchCoalescer::new();
        coalescer.record_request();
        coalescer.record_request();
        coalescer.record_hit();

        let stats = coalescer.stats();
        assert_eq!(stats.network_requests, 2);
        assert_eq!(stats.cache_hits, 1);
    }
}
