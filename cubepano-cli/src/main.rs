//! cubepano CLI - Command-line interface
//!
//! This binary assembles equirectangular panoramas from the cube-face tile
//! servers listed in a location file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cubepano::config::{DEFAULT_DATA_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_TEMP_DIR};

use commands::count::CountArgs;
use commands::probe::ProbeArgs;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "cubepano")]
#[command(version = cubepano::VERSION)]
#[command(about = "Assemble equirectangular panoramas from cube-face tile servers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, assemble and project every panorama in the location file
    Run {
        /// Location file (JSON)
        #[arg(long, default_value = DEFAULT_DATA_FILE)]
        data: PathBuf,

        /// Root directory for finished panoramas
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Directory for transient tiles (removed after each panorama)
        #[arg(long, default_value = DEFAULT_TEMP_DIR)]
        temp_dir: PathBuf,

        /// Pyramid level to assemble
        #[arg(long)]
        level: Option<u8>,

        /// Maximum tiles probed along each face axis
        #[arg(long)]
        max_probe: Option<u32>,

        /// Maximum concurrent HTTP requests
        #[arg(long)]
        concurrency: Option<usize>,

        /// Only process the location with this name
        #[arg(long)]
        location: Option<String>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Print the tile grid of every face of one panorama
    Probe {
        /// Location file (JSON)
        #[arg(long, default_value = DEFAULT_DATA_FILE)]
        data: PathBuf,

        /// Name of the location the panorama belongs to
        #[arg(long)]
        location: String,

        /// Panorama id
        #[arg(long)]
        pano: String,

        /// Pyramid level to probe
        #[arg(long)]
        level: Option<u8>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Count .jpg files in a directory tree
    Count {
        /// Directory to scan
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            data,
            output,
            temp_dir,
            level,
            max_probe,
            concurrency,
            location,
            debug,
        } => commands::run::run(RunArgs {
            data,
            output,
            temp_dir,
            level,
            max_probe,
            concurrency,
            location,
            debug,
        }),
        Commands::Probe {
            data,
            location,
            pano,
            level,
            debug,
        } => commands::probe::run(ProbeArgs {
            data,
            location,
            pano,
            level,
            debug,
        }),
        Commands::Count { path } => commands::count::run(CountArgs { path }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
