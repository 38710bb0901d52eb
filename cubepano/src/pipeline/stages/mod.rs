//! Pipeline stages for panorama assembly.
//!
//! Each stage is responsible for a single step, leaf-first:
//!
//! 1. **Fetch** - bring one tile into the tile store (coalesced, cached)
//! 2. **Probe** - discover the tile grid of a face
//! 3. **Resolve** - produce a tile image, falling back to coarser levels
//! 4. **Assembly** - composite every tile of a face and save it
//! 5. **Encode** - JPEG reading and writing on the blocking pool

mod assembly;
mod encode;
mod fetch;
mod probe;
mod resolve;

#[cfg(test)]
pub(crate) mod test_support;

pub use assembly::{assemble_face, face_path, FaceImage};
pub use encode::{load_rgb, save_jpeg};
pub use fetch::fetch_tile;
pub use probe::probe_grid;
pub use resolve::resolve_tile;
