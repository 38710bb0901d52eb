//! cubepano - Cube-face panorama assembly from tiled-pyramid image servers
//!
//! This library downloads the tiles of a panorama from a server laid out as
//! `{pano}/{face}/{level}/{x}_{y}.jpg`, discovers the tile grid of every face
//! without a manifest, rebuilds missing tiles from coarser pyramid levels,
//! and projects the six assembled faces onto an equirectangular image.
//!
//! # High-Level API
//!
//! ```ignore
//! use cubepano::config::load_locations;
//! use cubepano::log::TracingLogger;
//! use cubepano::pipeline::{BatchRunner, PipelineConfig};
//! use cubepano::projection::CubemapProjector;
//! use cubepano::provider::AsyncReqwestClient;
//! use std::sync::Arc;
//!
//! let locations = load_locations("data.json".as_ref())?;
//! let runner = BatchRunner::new(
//!     AsyncReqwestClient::new()?,
//!     CubemapProjector::new(),
//!     PipelineConfig::default(),
//!     Arc::new(TracingLogger),
//! );
//!
//! let summary = runner.run(&locations).await;
//! println!("{} panoramas written", summary.projected);
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod inventory;
pub mod log;
pub mod logging;
pub mod pipeline;
pub mod projection;
pub mod provider;

/// Version of the cubepano library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
