//! In-memory tile store.

use dashmap::DashMap;

use super::r#trait::TileStore;
use crate::coord::TileCoord;

/// Tile store that keeps everything in memory.
///
/// Used by tests and by `probe`-style dry runs where nothing should touch
/// the disk.
#[derive(Debug, Default)]
pub struct MemoryTileStore {
    tiles: DashMap<TileCoord, Vec<u8>>,
}

impl MemoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileStore for MemoryTileStore {
    async fn contains(&self, coord: &TileCoord) -> bool {
        self.tiles.contains_key(coord)
    }

    async fn read(&self, coord: &TileCoord) -> Option<Vec<u8>> {
        self.tiles.get(coord).map(|entry| entry.value().clone())
    }

    async fn write(&self, coord: &TileCoord, data: Vec<u8>) -> Result<(), std::io::Error> {
        self.tiles.insert(*coord, data);
        Ok(())
    }

    async fn purge(&self) -> Result<(), std::io::Error> {
        self.tiles.clear();
        Ok(())
    }
}
