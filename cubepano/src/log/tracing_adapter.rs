//! Tracing library adapter implementation.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger implementation that delegates to the `tracing` crate.
///
/// Messages end up in whatever subscriber
/// [`init_logging`](crate::logging::init_logging) installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "cubepano", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "cubepano", "{}", args),
            LogLevel::Info => tracing::info!(target: "cubepano", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "cubepano", "{}", args),
            LogLevel::Error => tracing::error!(target: "cubepano", "{}", args),
        }
    }
}
