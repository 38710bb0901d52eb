//! Async panorama pipeline.
//!
//! This module turns the tiles of one panorama into an equirectangular
//! image. Tiles are downloaded concurrently, missing tiles are rebuilt from
//! coarser pyramid levels, and the six assembled faces are handed to a
//! [`Projector`](crate::projection::Projector).
//!
//! # Architecture
//!
//! ```text
//! BatchRunner → process_panorama → assemble_face (×6) → probe_grid
//!                                                     → resolve_tile → fetch_tile
//!                                → load faces → project → save → cleanup
//! ```
//!
//! # Request Coalescing
//!
//! Fallback chains of neighbouring tiles ask for the same ancestors. The
//! [`FetchCoalescer`] serializes fetches per coordinate and remembers
//! misses, so each tile is requested at most once per panorama.
//!
//! # Key Components
//!
//! - [`PanoramaContext`] - Shared resources for the stages of one panorama
//! - [`HttpConcurrencyLimiter`] - Global bound on in-flight HTTP requests
//! - [`process_panorama`] - Runs one panorama through all stages
//! - [`BatchRunner`] - Runs every panorama of a location list

mod coalesce;
mod context;
mod error;
mod http_limiter;
mod processor;
mod runner;
pub mod stages;

pub use coalesce::{FetchCoalescer, FetchStats};
pub use context::{PanoramaContext, PipelineConfig};
pub use error::PipelineError;
pub use http_limiter::{HttpConcurrencyLimiter, HttpPermit};
pub use processor::{probe_faces, process_panorama, PanoramaOutcome};
pub use runner::{BatchRunner, PanoramaFailure, RunSummary};
