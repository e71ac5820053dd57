//! Telemetry failures.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Why logging could not be set up.
#[derive(Debug)]
pub enum TelemetryError {
    /// The fallback level is not a valid filter directive.
    InvalidFilter {
        /// Directive as configured.
        directive: String,
        /// Parser error.
        source: ParseError,
    },
    /// A global subscriber is already installed.
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: TryInitError,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter { directive, .. } => {
                write!(formatter, "invalid log filter `{directive}`")
            }
            Self::SubscriberInstall { .. } => formatter.write_str("logging is already initialised"),
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFilter { source, .. } => Some(source),
            Self::SubscriberInstall { source } => Some(source),
        }
    }
}
