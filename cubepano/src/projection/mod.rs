//! Cube-face to equirectangular projection.
//!
//! The pipeline hands the six assembled faces to a [`Projector`], which
//! returns one equirectangular image twice as wide as it is tall.
//!
//! # Example
//!
//! ```
//! use cubepano::projection::{CubeFaces, CubemapProjector, Projector};
//! use image::{Rgb, RgbImage};
//!
//! let faces = CubeFaces::new(std::array::from_fn(|_| {
//!     RgbImage::from_pixel(8, 8, Rgb([40, 80, 120]))
//! }))
//! .unwrap();
//!
//! let panorama = CubemapProjector::new().project(&faces, 16, 32).unwrap();
//! assert_eq!(panorama.dimensions(), (32, 16));
//! ```

mod cubemap;
mod error;
mod faces;
mod r#trait;

pub use cubemap::CubemapProjector;
pub use error::ProjectionError;
pub use faces::CubeFaces;
pub use r#trait::Projector;
