//! Inventory of finished panoramas on disk.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Errors from inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("path '{}' does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Counts `.jpg` files below `path`, including subdirectories.
///
/// The extension match is case-insensitive. Entries that cannot be read are
/// skipped.
///
/// # Example
///
/// ```
/// use cubepano::inventory::count_images;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
/// std::fs::write(dir.path().join("b.png"), b"").unwrap();
///
/// assert_eq!(count_images(dir.path()).unwrap(), 1);
/// ```
pub fn count_images(path: &Path) -> Result<usize, InventoryError> {
    if !path.is_dir() {
        return Err(InventoryError::NotADirectory(path.to_path_buf()));
    }

    let count = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_jpeg(entry.path()))
        .count();

    Ok(count)
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("jpg"))
        .unwrap_or(false)
}
