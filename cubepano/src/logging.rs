//! Logging infrastructure for cubepano.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `logs/cubepano.log` (cleared on session start)
//! - Also prints to stdout for following a run live
//! - Level from `RUST_LOG`, else `info` (or `debug` when requested)

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file and
/// sets up output to both the file and stdout.
///
/// # Arguments
///
/// * `log_dir` - Directory for log files (e.g., "logs")
/// * `log_file` - Log filename (e.g., "cubepano.log")
/// * `debug` - Default to `debug` level instead of `info`
///
/// # Errors
///
/// Returns error if log directory cannot be created or log file cannot be cleared
pub fn init_logging(log_dir: &str, log_file: &str, debug: bool) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;
    clear_log_file(Path::new(log_dir), log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(false);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Truncates (or creates) the log file.
fn clear_log_file(log_dir: &Path, log_file: &str) -> Result<(), io::Error> {
    fs::write(log_dir.join(log_file), "")
}

/// Filter used when `RUST_LOG` is not set.
fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug,hyper=info,reqwest=info,rustls=info"
    } else {
        "info"
    }
}

/// Get default log directory path.
pub fn default_log_dir() -> &'static str {
    "logs"
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    "cubepano.log"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert_eq!(default_log_dir(), "logs");
        assert_eq!(default_log_file(), "cubepano.log");
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "info");
        assert!(default_filter(true).starts_with("debug"));
    }

    #[test]
    fn test_clear_log_file_truncates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("cubepano.log");
        fs::write(&log_path, "old log data").unwrap();

        clear_log_file(temp_dir.path(), "cubepano.log").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_clear_log_file_creates() {
        let temp_dir = tempfile::tempdir().unwrap();

        clear_log_file(temp_dir.path(), "fresh.log").unwrap();

        assert!(temp_dir.path().join("fresh.log").exists());
    }

    #[test]
    fn test_guard_structure() {
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard { _file_guard: guard };
    }

    // Installing the global subscriber can only happen once per process,
    // so init_logging itself is exercised by the CLI, not here.
}
