//! Logging abstraction layer.
//!
//! User-visible progress (panorama started, face merged, tile missing) goes
//! through the [`Logger`] trait so that pipeline components never reach for
//! a global logger. Lower-level diagnostics use `tracing` macros directly.
//!
//! - `Logger` trait: the interface handed to the pipeline through its context
//! - `TracingLogger`: production adapter that delegates to `tracing`
//! - `NoOpLogger`: discards everything
//! - `MemoryLogger`: keeps messages for assertions in tests
//!
//! ```
//! use cubepano::log::{Logger, MemoryLogger};
//! use cubepano::{log_info, log_warn};
//! use std::sync::Arc;
//!
//! let logger = Arc::new(MemoryLogger::new());
//! log_info!(logger, "Downloading panorama {}", "p1");
//! log_warn!(logger, "Face {}: no tiles found", "u");
//! assert_eq!(logger.warnings(), vec!["Face u: no tiles found".to_string()]);
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::MemoryLogger;
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
