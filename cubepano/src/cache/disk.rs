//! Disk-backed tile store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use super::r#trait::TileStore;
use crate::coord::TileCoord;

/// Stores the tiles of one panorama below a cache directory.
///
/// # Directory Structure
///
/// ```text
/// {cache_dir}/{face}/{level}_{x}_{y}.jpg
/// ```
///
/// `cache_dir` is normally `{temp_root}/{pano_id}`, see
/// [`OutputConfig::tile_cache_dir`](crate::config::OutputConfig::tile_cache_dir).
pub struct DiskTileStore {
    cache_dir: PathBuf,
    /// Bytes written during this session.
    bytes_written: AtomicU64,
}

impl DiskTileStore {
    /// Creates a store rooted at `cache_dir`. Nothing is created on disk
    /// until the first write.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            bytes_written: AtomicU64::new(0),
        }
    }

    /// Returns the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the bytes written since the store was created.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Constructs the path of a tile file.
    pub fn tile_path(&self, coord: &TileCoord) -> PathBuf {
        self.cache_dir
            .join(coord.face.token())
            .join(format!("{}_{}_{}.jpg", coord.level, coord.x, coord.y))
    }
}

impl TileStore for DiskTileStore {
    async fn contains(&self, coord: &TileCoord) -> bool {
        tokio::fs::try_exists(self.tile_path(coord))
            .await
            .unwrap_or(false)
    }

    async fn read(&self, coord: &TileCoord) -> Option<Vec<u8>> {
        tokio::fs::read(self.tile_path(coord)).await.ok()
    }

    async fn write(&self, coord: &TileCoord, data: Vec<u8>) -> Result<(), std::io::Error> {
        let path = self.tile_path(coord);
        let data_len = data.len() as u64;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, data).await?;
        self.bytes_written.fetch_add(data_len, Ordering::Relaxed);

        trace!(tile = %coord, bytes = data_len, path = %path.display(), "Tile stored");
        Ok(())
    }

    async fn purge(&self) -> Result<(), std::io::Error> {
        match tokio::fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Face;

    #[test]
    fn test_tile_path_construction() {
        let store = DiskTileStore::new("/tmp/tiles/pano");

        assert_eq!(
            store.tile_path(&TileCoord::new(Face::Right, 2, 3, 1)),
            PathBuf::from("/tmp/tiles/pano/r/2_3_1.jpg")
        );
        assert_eq!(
            store.tile_path(&TileCoord::new(Face::Front, 0, 0, 0)),
            PathBuf::from("/tmp/tiles/pano/f/0_0_0.jpg")
        );
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path().join("pano"));
        let coord = TileCoord::new(Face::Back, 1, 1, 0);

        assert!(!store.contains(&coord).await);
        assert!(store.read(&coord).await.is_none());

        let data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        store.write(&coord, data.clone()).await.unwrap();

        assert!(store.contains(&coord).await);
        assert_eq!(store.read(&coord).await, Some(data));
        assert_eq!(store.bytes_written(), 4);
    }

    #[tokio::test]
    async fn test_purge_removes_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("pano");
        let store = DiskTileStore::new(&root);

        for face in Face::ALL {
            store
                .write(&TileCoord::new(face, 0, 0, 0), vec![1])
                .await
                .unwrap();
        }
        assert!(root.exists());

        store.purge().await.unwrap();
        assert!(!root.exists());
        assert!(!store.contains(&TileCoord::new(Face::Up, 0, 0, 0)).await);
    }

    #[tokio::test]
    async fn test_purge_missing_directory_is_ok() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskTileStore::new(temp_dir.path().join("never-written"));

        assert!(store.purge().await.is_ok());
    }
}
