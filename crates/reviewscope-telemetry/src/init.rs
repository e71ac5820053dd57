//! Subscriber installation.
//!
//! Events always go to stderr; stdout is reserved for command output so it
//! can be piped into `jq` or a file.

use std::io::IsTerminal;

use crate::error::{Result, TelemetryError};
use once_cell::sync::OnceCell;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Filter applied when neither `RUST_LOG` nor a flag says otherwise.
pub const DEFAULT_LOG_LEVEL: &str = "info";

static APP_VERSION: OnceCell<String> = OnceCell::new();

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` wins over `config.filter` when it is set and valid.
///
/// # Errors
///
/// [`TelemetryError::InvalidFilter`] when the fallback filter does not parse,
/// [`TelemetryError::SubscriberInstall`] when a subscriber is already active.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config.filter)?;
    let output: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .compact()
            .with_ansi(config.ansi)
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };
    tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()
        .map_err(|source| TelemetryError::SubscriberInstall { source })?;

    let _ = APP_VERSION.set(config.version.to_string());
    tracing::debug!(version = app_version(), format = ?config.format, "logging ready");
    Ok(())
}

/// Version recorded by [`init_logging`]; `unknown` before that.
#[must_use]
pub fn app_version() -> &'static str {
    APP_VERSION.get().map_or("unknown", String::as_str)
}

/// How and what to log.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Fallback `EnvFilter` directive, e.g. `warn` or `reviewscope_pipeline=debug`.
    pub filter: &'a str,
    /// Encoding of each event.
    pub format: LogFormat,
    /// Colour escapes in pretty output.
    pub ansi: bool,
    /// Reported once at start-up and by [`app_version`].
    pub version: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            ansi: ansi_wanted(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Output encoding for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Compact human-readable lines.
    Pretty,
}

impl LogFormat {
    /// Pretty when stderr is a terminal, JSON otherwise.
    #[must_use]
    pub fn infer() -> Self {
        if std::io::stderr().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Colour unless `NO_COLOR` is set or stderr is redirected.
#[must_use]
pub fn ansi_wanted() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

fn env_filter(fallback: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback).map_err(|source| TelemetryError::InvalidFilter {
            directive: fallback.to_string(),
            source,
        }),
    }
}
