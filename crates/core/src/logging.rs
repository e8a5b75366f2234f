//! Tracing setup for binaries embedding the boundary and the SSO cache.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Where and how log output is written
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// File name prefix for the rolling log (e.g. "cli" gives `cli.log.2026-10-14`)
    pub component: String,
    /// Directory for log files; `None` disables the file layer
    pub log_dir: Option<PathBuf>,
    /// Mirror output to stderr
    pub to_stderr: bool,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl LoggingOptions {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            log_dir: Some(default_log_dir()),
            to_stderr: false,
            default_filter: "info".to_string(),
        }
    }

    pub fn with_stderr(mut self, to_stderr: bool) -> Self {
        self.to_stderr = to_stderr;
        self
    }

    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }
}

/// `$HOME/.hostbound/logs`, falling back to the working directory
pub fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".hostbound").join("logs")
}

/// Install the global subscriber.
///
/// Returns the file writer guard (keep it alive for the life of the process), or
/// `None` when file logging is disabled. A second call is a no-op.
pub fn init_logging(options: &LoggingOptions) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_filter.as_str()));

    let (file_layer, guard) = match &options.log_dir {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, &options.component);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    let stderr_layer = options.to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed; keeping it");
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = LoggingOptions::new("cli");
        assert_eq!(options.component, "cli");
        assert!(!options.to_stderr);
        assert_eq!(options.default_filter, "info");
        assert!(options.log_dir.unwrap().ends_with(".hostbound/logs"));
    }

    #[test]
    fn test_init_twice_without_file_layer() {
        let options = LoggingOptions::new("test").with_log_dir(None);
        assert!(init_logging(&options).is_none());
        assert!(init_logging(&options).is_none());
    }
}
