use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Console filter used when `RUST_LOG` is unset.
const DEFAULT_CONSOLE_FILTER: &str = "warn";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("cannot open log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: std::io::Error },

    #[error("telemetry already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Where log output goes.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Append-only log file receiving `info` and above, including turn records.
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines instead of plain text.
    pub json: bool,
    /// Console directive used when `RUST_LOG` is unset. Defaults to `warn`.
    pub console_filter: Option<String>,
}

/// Build a layer appending `info`-and-above events to `path`.
pub fn file_layer<S>(
    path: &Path,
    json: bool,
) -> Result<Box<dyn Layer<S> + Send + Sync + 'static>, TelemetryError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TelemetryError::LogFile { path: path.to_path_buf(), source })?;
    let writer = Arc::new(file);

    let layer = if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(LevelFilter::INFO)
            .boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).with_filter(LevelFilter::INFO).boxed()
    };
    Ok(layer)
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let directive = config.console_filter.as_deref().unwrap_or(DEFAULT_CONSOLE_FILTER);
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter)
        .boxed();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![console];
    if let Some(path) = &config.log_file {
        layers.push(file_layer(path, config.json)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(log_file = ?config.log_file, json = config.json, "telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_logs_to_console_only() {
        let config = TelemetryConfig::default();
        assert!(config.log_file.is_none());
        assert!(!config.json);
    }

    #[test]
    fn unopenable_log_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("turns.log");
        let Err(err) = file_layer::<Registry>(&path, false) else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("turns.log"));
    }
}
