// Tracing setup shared by the server and the CLI.
use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the file writer flushing; drop it only at process exit.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber: human-readable console output, plus JSON lines in
/// `settings.directory` when one is configured.
pub fn init_tracing(settings: &LoggingSettings) -> Result<LogGuard, ConfigError> {
    let console_filter = build_filter(&settings.level)?;
    let console_layer = fmt::layer().with_target(true).with_filter(console_filter);

    match &settings.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)
                .map_err(|e| ConfigError::LoggingError(format!("{}: {}", directory.display(), e)))?;

            let file_appender = tracing_appender::rolling::daily(directory, "fund-analytics.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(build_filter(&settings.level)?);

            tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

            Ok(LogGuard {
                _file_guard: Some(guard),
            })
        }
        None => {
            tracing_subscriber::registry()
                .with(console_layer)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

            Ok(LogGuard { _file_guard: None })
        }
    }
}

// RUST_LOG wins over the configured level.
fn build_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| ConfigError::LoggingError(format!("invalid level '{}': {}", level, e))),
    }
}
