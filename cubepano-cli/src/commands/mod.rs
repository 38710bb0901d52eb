//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`count`] - Count finished panoramas in a directory tree
//! - [`probe`] - Print the face grids of one panorama
//! - [`run`] - Main command (assemble every panorama of the location file)

pub mod count;
pub mod probe;
pub mod run;
