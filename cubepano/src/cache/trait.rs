//! Tile store trait definition for dependency injection.

use crate::coord::TileCoord;
use std::future::Future;

/// Storage for downloaded tiles of one panorama.
///
/// The store is additive while a panorama is processed: tiles are written
/// once and never replaced. [`purge`](TileStore::purge) discards everything
/// when the panorama is done.
///
/// # Example
///
/// ```
/// use cubepano::cache::{MemoryTileStore, TileStore};
/// use cubepano::coord::{Face, TileCoord};
///
/// # tokio_test_block_on(async {
/// let store = MemoryTileStore::new();
/// let coord = TileCoord::new(Face::Front, 0, 0, 0);
///
/// assert!(!store.contains(&coord).await);
/// store.write(&coord, vec![0xFF, 0xD8]).await.unwrap();
/// assert_eq!(store.read(&coord).await, Some(vec![0xFF, 0xD8]));
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub trait TileStore: Send + Sync {
    /// Returns true if the tile has already been stored.
    fn contains(&self, coord: &TileCoord) -> impl Future<Output = bool> + Send;

    /// Reads a stored tile.
    ///
    /// Returns `None` if the tile is absent or unreadable.
    fn read(&self, coord: &TileCoord) -> impl Future<Output = Option<Vec<u8>>> + Send;

    /// Stores a tile, creating any parent directories.
    fn write(
        &self,
        coord: &TileCoord,
        data: Vec<u8>,
    ) -> impl Future<Output = Result<(), std::io::Error>> + Send;

    /// Removes every stored tile.
    ///
    /// Purging an already empty store succeeds.
    fn purge(&self) -> impl Future<Output = Result<(), std::io::Error>> + Send;
}
