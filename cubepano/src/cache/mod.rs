//! Tile storage for the download stages.
//!
//! Downloaded tiles are kept per panorama so repeated requests for the same
//! tile (direct fetches and fallback ancestors) hit the network once.

mod disk;
mod memory;
mod r#trait;

pub use disk::DiskTileStore;
pub use memory::MemoryTileStore;
pub use r#trait::TileStore;
