//! Tile pyramid coordinates
//!
//! Types addressing the tiles of a cube-face pyramid: the six faces, a tile
//! position at a given level, the rectangular grid found for a face, and the
//! geometry used to recover a missing tile from a coarser level.

mod types;

pub use types::{
    scale_between, AncestorRegion, CoordError, Face, GridExtent, TileCoord, TILE_SIZE,
};
