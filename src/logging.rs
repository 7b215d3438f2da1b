//! Diagnostics for the `shacl-report` binary.
//!
//! The grouped report owns stdout, so events only ever go to stderr or to a
//! log file. `RUST_LOG` overrides the configured filter.

use anyhow::{Context, Result, bail};
use std::env;
use std::io;
use std::path::PathBuf;
use strum::{Display, EnumString};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const FORMAT_VAR: &str = "SHACL_REPORT_LOG_FORMAT";
const FILE_VAR: &str = "SHACL_REPORT_LOG_FILE";
const FILTER_VAR: &str = "SHACL_REPORT_LOG";
const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One line per event.
    #[default]
    Compact,
    Pretty,
    /// Newline-delimited JSON, for collecting runs in CI.
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogDestination {
    #[default]
    Stderr,
    /// Appended to across runs.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub destination: LogDestination,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            destination: LogDestination::default(),
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from `SHACL_REPORT_LOG*` variables. Unknown
    /// formats and empty values fall back to the defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(format) = lookup(FORMAT_VAR) {
            config.format = format.trim().parse().unwrap_or(config.format);
        }
        if let Some(path) = lookup(FILE_VAR) {
            config.destination = LogDestination::File(PathBuf::from(path));
        }
        if let Some(filter) = lookup(FILTER_VAR) {
            config.filter = filter;
        }
        config
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
    }
}

/// Installs the global subscriber. Keep the guard alive until the report has
/// been written, or buffered events are lost.
pub fn init_logging(config: LoggingConfig) -> Result<WorkerGuard> {
    let (writer, guard) = match &config.destination {
        LogDestination::Stderr => tracing_appender::non_blocking(io::stderr()),
        LogDestination::File(path) => {
            let Some(file_name) = path.file_name() else {
                bail!("log file path {:?} has no file name", path);
            };
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {:?}", dir))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
    };
    let ansi = config.destination == LogDestination::Stderr;

    let layer = match config.format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_filter(config.env_filter())
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_filter(config.env_filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_filter(config.env_filter())
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        format = %config.format,
        destination = ?config.destination,
        "logging initialized"
    );
    Ok(guard)
}
