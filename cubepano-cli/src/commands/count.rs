//! Count command - count .jpg files in a directory tree.

use std::path::PathBuf;

use cubepano::inventory::count_images;

use crate::error::CliError;

/// Arguments for the count command.
pub struct CountArgs {
    pub path: PathBuf,
}

/// Run the count command.
pub fn run(args: CountArgs) -> Result<(), CliError> {
    let total = count_images(&args.path)?;
    println!(
        "Total .jpg files (including subdirectories) in '{}': {}",
        args.path.display(),
        total
    );
    Ok(())
}
