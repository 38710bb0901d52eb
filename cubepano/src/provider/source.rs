//! Tile URL construction and the HTTP-backed tile provider.

use std::time::Duration;

use tracing::trace;

use super::http::AsyncHttpClient;
use super::types::{AsyncTileProvider, ProviderError};
use crate::config::{DownloadConfig, Location};
use crate::coord::TileCoord;

/// Builds tile URLs for one panorama.
///
/// URLs follow `{base_url}{pano_id}/{face}/{level}/{x}_{y}.jpg{version}`.
///
/// # Example
///
/// ```
/// use cubepano::coord::{Face, TileCoord};
/// use cubepano::provider::TileSource;
///
/// let source = TileSource::new("https://tiles.example.com/tour/", "p1", "?v=2");
/// let url = source.tile_url(&TileCoord::new(Face::Left, 1, 0, 1));
/// assert_eq!(url, "https://tiles.example.com/tour/p1/l/1/0_1.jpg?v=2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    base_url: String,
    pano_id: String,
    version_suffix: String,
}

impl TileSource {
    /// Creates a source. `base_url` must already end with `/`.
    pub fn new(
        base_url: impl Into<String>,
        pano_id: impl Into<String>,
        version_suffix: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            pano_id: pano_id.into(),
            version_suffix: version_suffix.into(),
        }
    }

    /// Creates a source for one panorama of a location.
    pub fn for_location(location: &Location, pano_id: &str) -> Self {
        Self::new(
            location.base_url.clone(),
            pano_id,
            location.version_suffix(),
        )
    }

    /// Returns the URL of a tile.
    pub fn tile_url(&self, coord: &TileCoord) -> String {
        format!(
            "{}{}/{}/{}/{}_{}.jpg{}",
            self.base_url,
            self.pano_id,
            coord.face.token(),
            coord.level,
            coord.x,
            coord.y,
            self.version_suffix
        )
    }

    /// Panorama id of this source.
    pub fn pano_id(&self) -> &str {
        &self.pano_id
    }
}

/// Tile provider backed by an [`AsyncHttpClient`].
///
/// Existence checks use HEAD with the short probe timeout, downloads use
/// GET with the longer download timeout.
pub struct HttpTileProvider<C: AsyncHttpClient> {
    client: C,
    source: TileSource,
    head_timeout: Duration,
    get_timeout: Duration,
}

impl<C: AsyncHttpClient> HttpTileProvider<C> {
    /// Creates a provider with the timeouts of `config`.
    pub fn new(client: C, source: TileSource, config: &DownloadConfig) -> Self {
        Self {
            client,
            source,
            head_timeout: config.head_timeout(),
            get_timeout: config.get_timeout(),
        }
    }

    /// URL source of this provider.
    pub fn source(&self) -> &TileSource {
        &self.source
    }
}

impl<C: AsyncHttpClient> AsyncTileProvider for HttpTileProvider<C> {
    async fn exists(&self, coord: &TileCoord) -> bool {
        let url = self.source.tile_url(coord);
        match self.client.head(&url, self.head_timeout).await {
            Ok(status) => {
                trace!(tile = %coord, status = status, "Probe response");
                status == 200
            }
            Err(e) => {
                trace!(tile = %coord, error = %e, "Probe failed");
                false
            }
        }
    }

    async fn download(&self, coord: &TileCoord) -> Result<Vec<u8>, ProviderError> {
        let url = self.source.tile_url(coord);
        self.client.get(&url, self.get_timeout).await
    }

    fn pano_id(&self) -> &str {
        self.source.pano_id()
    }
}
