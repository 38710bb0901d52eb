//! Run command - assemble every panorama of the location file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use cubepano::config::{DownloadConfig, OutputConfig};
use cubepano::log::TracingLogger;
use cubepano::pipeline::{BatchRunner, PipelineConfig, RunSummary};
use cubepano::projection::CubemapProjector;
use cubepano::provider::AsyncReqwestClient;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
pub struct RunArgs {
    pub data: PathBuf,
    pub output: PathBuf,
    pub temp_dir: PathBuf,
    pub level: Option<u8>,
    pub max_probe: Option<u32>,
    pub concurrency: Option<usize>,
    pub location: Option<String>,
    pub debug: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("run");

    let locations = runner.load_locations(&args.data, args.location.as_deref())?;
    let config = pipeline_config(&args);
    let panoramas: usize = locations.iter().map(|l| l.panoramas.len()).sum();

    println!("cubepano v{}", cubepano::VERSION);
    println!("================================");
    println!();
    println!("Locations: {}", locations.len());
    println!("Panoramas: {}", panoramas);
    println!("Level:     {}", config.level);
    println!("Output:    {}", config.output.output_root().display());
    println!();

    let client = AsyncReqwestClient::new().map_err(CliError::HttpClient)?;
    let batch = BatchRunner::new(
        client,
        CubemapProjector::new(),
        config,
        Arc::new(TracingLogger),
    );

    let start = Instant::now();
    let summary = runner.runtime()?.block_on(batch.run(&locations));
    let elapsed = start.elapsed();

    info!(
        peak_http = batch.http_limiter().peak_in_flight(),
        "Run finished in {:.1}s",
        elapsed.as_secs_f64()
    );
    print_summary(&summary, elapsed.as_secs_f64());

    if summary.is_success() {
        Ok(())
    } else {
        Err(CliError::PanoramasFailed {
            failed: summary.failures.len(),
            total: summary.total(),
        })
    }
}

/// Builds the pipeline configuration from command-line overrides.
fn pipeline_config(args: &RunArgs) -> PipelineConfig {
    let mut download = DownloadConfig::new();
    if let Some(max_probe) = args.max_probe {
        download = download.with_max_probe(max_probe);
    }
    if let Some(concurrency) = args.concurrency {
        download = download.with_max_concurrent_requests(concurrency);
    }

    let output = OutputConfig::new()
        .with_output_root(&args.output)
        .with_temp_root(&args.temp_dir);

    let config = PipelineConfig::new(download, output);
    match args.level {
        Some(level) => config.with_level(level),
        None => config,
    }
}

fn print_summary(summary: &RunSummary, secs: f64) {
    println!();
    println!("Finished in {:.1}s", secs);
    println!("  Projected: {}", summary.projected);
    println!("  Skipped:   {} (no tiles)", summary.skipped);
    println!("  Failed:    {}", summary.failures.len());
    for failure in &summary.failures {
        println!(
            "    {}/{}: {}",
            failure.location, failure.pano_id, failure.error
        );
    }
}
