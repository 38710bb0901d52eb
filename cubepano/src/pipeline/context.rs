//! Pipeline context containing shared resources.
//!
//! The `PanoramaContext` provides the pipeline stages with everything they
//! need for one panorama: the tile provider, the tile store, the HTTP
//! limiter, the fetch coalescer, the logger and the configuration. Nothing
//! is global; a context is created per panorama and dropped afterwards.

use std::sync::Arc;

use crate::cache::TileStore;
use crate::config::{DownloadConfig, OutputConfig, DEFAULT_LEVEL};
use crate::log::Logger;
use crate::pipeline::coalesce::FetchCoalescer;
use crate::pipeline::http_limiter::HttpConcurrencyLimiter;
use crate::provider::AsyncTileProvider;

/// Configuration for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Network timeouts and concurrency limits
    pub download: DownloadConfig,

    /// Output, face and tile-cache locations
    pub output: OutputConfig,

    /// Pyramid level assembled for every face
    pub level: u8,
}

impl PipelineConfig {
    pub fn new(download: DownloadConfig, output: OutputConfig) -> Self {
        Self {
            download,
            output,
            level: DEFAULT_LEVEL,
        }
    }

    /// Set the pyramid level to assemble.
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DownloadConfig::default(), OutputConfig::default())
    }
}

/// Shared context for the stages working on one panorama.
///
/// Cheaply cloneable (everything is behind `Arc`) so it can be moved into
/// spawned tasks.
pub struct PanoramaContext<P, S>
where
    P: AsyncTileProvider,
    S: TileStore,
{
    /// Tile server access for this panorama
    pub provider: Arc<P>,

    /// Downloaded tiles of this panorama
    pub store: Arc<S>,

    /// Bound on concurrent HTTP requests
    pub http_limiter: Arc<HttpConcurrencyLimiter>,

    /// Per-tile fetch serialization and miss memory
    pub coalescer: Arc<FetchCoalescer>,

    /// Progress logger
    pub logger: Arc<dyn Logger>,

    /// Pipeline configuration
    pub config: Arc<PipelineConfig>,
}

impl<P, S> PanoramaContext<P, S>
where
    P: AsyncTileProvider,
    S: TileStore,
{
    /// Creates a context with a fresh limiter and coalescer.
    pub fn new(
        provider: Arc<P>,
        store: Arc<S>,
        logger: Arc<dyn Logger>,
        config: Arc<PipelineConfig>,
    ) -> Self {
        let http_limiter = Arc::new(HttpConcurrencyLimiter::new(
            config.download.max_concurrent_requests(),
        ));
        Self {
            provider,
            store,
            http_limiter,
            coalescer: Arc::new(FetchCoalescer::new()),
            logger,
            config,
        }
    }

    /// Replaces the HTTP limiter, e.g. to share one across panoramas.
    pub fn with_http_limiter(mut self, limiter: Arc<HttpConcurrencyLimiter>) -> Self {
        self.http_limiter = limiter;
        self
    }

    /// Panorama id served by the provider.
    pub fn pano_id(&self) -> &str {
        self.provider.pano_id()
    }
}

impl<P, S> Clone for PanoramaContext<P, S>
where
    P: AsyncTileProvider,
    S: TileStore,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            store: Arc::clone(&self.store),
            http_limiter: Arc::clone(&self.http_limiter),
            coalescer: Arc::clone(&self.coalescer),
            logger: Arc::clone(&self.logger),
            config: Arc::clone(&self.config),
        }
    }
}
