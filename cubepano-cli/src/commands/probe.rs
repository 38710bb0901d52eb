//! Probe command - print the face grids of one panorama.

use std::path::PathBuf;
use std::sync::Arc;

use cubepano::coord::{Face, GridExtent};
use cubepano::log::TracingLogger;
use cubepano::pipeline::{BatchRunner, PipelineConfig};
use cubepano::projection::CubemapProjector;
use cubepano::provider::AsyncReqwestClient;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the probe command.
pub struct ProbeArgs {
    pub data: PathBuf,
    pub location: String,
    pub pano: String,
    pub level: Option<u8>,
    pub debug: bool,
}

/// Run the probe command.
pub fn run(args: ProbeArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("probe");

    let locations = runner.load_locations(&args.data, Some(&args.location))?;
    let Some(location) = locations.first() else {
        return Err(CliError::UnknownLocation(args.location));
    };

    let mut config = PipelineConfig::default();
    if let Some(level) = args.level {
        config = config.with_level(level);
    }
    let level = config.level;

    let client = AsyncReqwestClient::new().map_err(CliError::HttpClient)?;
    let batch = BatchRunner::new(
        client,
        CubemapProjector::new(),
        config,
        Arc::new(TracingLogger),
    );

    let extents = runner
        .runtime()?
        .block_on(batch.probe(location, &args.pano));

    println!(
        "Panorama {} ({}) at level {}:",
        args.pano, location.name, level
    );
    for line in format_extents(&extents) {
        println!("  {}", line);
    }
    Ok(())
}

fn format_extents(extents: &[(Face, GridExtent)]) -> Vec<String> {
    extents
        .iter()
        .map(|(face, extent)| {
            if extent.is_empty() {
                format!("{}: no tiles", face)
            } else {
                let (width, height) = extent.pixel_size();
                format!(
                    "{}: {}x{} tiles -> {}x{}px",
                    face,
                    extent.columns(),
                    extent.rows(),
                    width,
                    height
                )
            }
        })
        .collect()
}
