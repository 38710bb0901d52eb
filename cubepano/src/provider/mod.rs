//! Tile server access
//!
//! This module provides the HTTP client abstraction and the tile provider
//! used by the probing and download stages.
//!
//! ```ignore
//! use cubepano::provider::{AsyncReqwestClient, HttpTileProvider, TileSource};
//!
//! let client = AsyncReqwestClient::new()?;
//! let source = TileSource::for_location(&location, "pano_01");
//! let provider = HttpTileProvider::new(client, source, &DownloadConfig::default());
//! ```

mod http;
mod source;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use source::{HttpTileProvider, TileSource};
pub use types::{AsyncTileProvider, ProviderError};

#[cfg(test)]
pub use http::tests::MockTileServer;
