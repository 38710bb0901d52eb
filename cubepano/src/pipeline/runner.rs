//! Batch runner - processes every panorama of every location.
//!
//! Panoramas are processed one after another. Each gets its own context
//! (tile store, coalescer) so nothing leaks between panoramas except the
//! HTTP client and the HTTP limiter. A failed panorama is recorded and the
//! run moves on.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::cache::{DiskTileStore, MemoryTileStore};
use crate::config::Location;
use crate::coord::{Face, GridExtent};
use crate::log::Logger;
use crate::pipeline::http_limiter::HttpConcurrencyLimiter;
use crate::pipeline::processor::{probe_faces, process_panorama, PanoramaOutcome};
use crate::pipeline::{PanoramaContext, PipelineConfig, PipelineError};
use crate::projection::Projector;
use crate::provider::{AsyncHttpClient, HttpTileProvider, TileSource};
use crate::{log_debug, log_error, log_info};

/// A panorama that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanoramaFailure {
    pub location: String,
    pub pano_id: String,
    pub error: String,
}

/// Totals of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Panoramas written to disk
    pub projected: usize,
    /// Panoramas without any face on the server
    pub skipped: usize,
    pub failures: Vec<PanoramaFailure>,
}

impl RunSummary {
    /// Total panoramas attempted.
    pub fn total(&self) -> usize {
        self.projected + self.skipped + self.failures.len()
    }

    /// True when no panorama failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the panorama pipeline over a list of locations.
///
/// # Example
///
/// ```ignore
/// use cubepano::config::load_locations;
/// use cubepano::log::TracingLogger;
/// use cubepano::pipeline::{BatchRunner, PipelineConfig};
/// use cubepano::projection::CubemapProjector;
/// use cubepano::provider::AsyncReqwestClient;
/// use std::sync::Arc;
///
/// let locations = load_locations("data.json".as_ref())?;
/// let runner = BatchRunner::new(
///     AsyncReqwestClient::new()?,
///     CubemapProjector::new(),
///     PipelineConfig::default(),
///     Arc::new(TracingLogger),
/// );
/// let summary = runner.run(&locations).await;
/// ```
pub struct BatchRunner<C, R>
where
    C: AsyncHttpClient + Clone + 'static,
    R: Projector + 'static,
{
    client: C,
    projector: Arc<R>,
    config: Arc<PipelineConfig>,
    logger: Arc<dyn Logger>,
    http_limiter: Arc<HttpConcurrencyLimiter>,
}

impl<C, R> BatchRunner<C, R>
where
    C: AsyncHttpClient + Clone + 'static,
    R: Projector + 'static,
{
    pub fn new(client: C, projector: R, config: PipelineConfig, logger: Arc<dyn Logger>) -> Self {
        let http_limiter = Arc::new(HttpConcurrencyLimiter::new(
            config.download.max_concurrent_requests(),
        ));
        Self {
            client,
            projector: Arc::new(projector),
            config: Arc::new(config),
            logger,
            http_limiter,
        }
    }

    /// Pipeline configuration used for every panorama.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// HTTP limiter shared by all panoramas of this runner.
    pub fn http_limiter(&self) -> &Arc<HttpConcurrencyLimiter> {
        &self.http_limiter
    }

    /// Processes every panorama of every location, in order.
    #[instrument(skip_all, fields(locations = locations.len()))]
    pub async fn run(&self, locations: &[Location]) -> RunSummary {
        let mut summary = RunSummary::default();

        for location in locations {
            log_info!(
                self.logger,
                "Location {}: {} panoramas",
                location.name,
                location.panoramas.len()
            );

            for pano_id in &location.panoramas {
                match self.run_panorama(location, pano_id).await {
                    Ok(PanoramaOutcome::Projected { .. }) => summary.projected += 1,
                    Ok(PanoramaOutcome::NoFaces) => summary.skipped += 1,
                    Err(e) => {
                        log_error!(self.logger, "Panorama {} failed: {}", pano_id, e);
                        summary.failures.push(PanoramaFailure {
                            location: location.name.clone(),
                            pano_id: pano_id.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            projected = summary.projected,
            skipped = summary.skipped,
            failed = summary.failures.len(),
            "Batch run complete"
        );
        summary
    }

    /// Processes one panorama with its tiles cached on disk.
    pub async fn run_panorama(
        &self,
        location: &Location,
        pano_id: &str,
    ) -> Result<PanoramaOutcome, PipelineError> {
        let cache_dir = self.config.output.tile_cache_dir(pano_id);
        log_debug!(
            self.logger,
            "Tile cache for {}: {}",
            pano_id,
            cache_dir.display()
        );
        let store = DiskTileStore::new(cache_dir);
        let ctx = self.context(location, pano_id, store);
        process_panorama(&ctx, Arc::clone(&self.projector), &location.name).await
    }

    /// Probes the face grids of one panorama without downloading tiles.
    pub async fn probe(&self, location: &Location, pano_id: &str) -> Vec<(Face, GridExtent)> {
        let ctx = self.context(location, pano_id, MemoryTileStore::new());
        probe_faces(&ctx).await
    }

    fn context<S: crate::cache::TileStore>(
        &self,
        location: &Location,
        pano_id: &str,
        store: S,
    ) -> PanoramaContext<HttpTileProvider<C>, S> {
        let source = TileSource::for_location(location, pano_id);
        let provider = HttpTileProvider::new(self.client.clone(), source, &self.config.download);

        PanoramaContext::new(
            Arc::new(provider),
            Arc::new(store),
            Arc::clone(&self.logger),
            Arc::clone(&self.config),
        )
        .with_http_limiter(Arc::clone(&self.http_limiter))
    }
}
