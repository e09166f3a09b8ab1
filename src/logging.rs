//! Structured logging setup for the `propload-gen` binary.
//!
//! Output goes to `stderr`; the level comes from `RUST_LOG` (default `info`)
//! and `PROPLOAD_LOG_FORMAT=json` switches to JSON lines.

use std::env;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FORMAT_ENV: &str = "PROPLOAD_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        name: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat { provided: String },
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

pub fn parse_log_format(raw: &str) -> Result<LogFormat, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "human" | "" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(LoggingError::UnsupportedFormat {
            provided: other.to_owned(),
        }),
    }
}

fn format_from_env() -> Result<LogFormat, LoggingError> {
    match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => parse_log_format(&raw),
        Err(env::VarError::NotPresent) => Ok(LogFormat::Human),
        Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
            name: LOG_FORMAT_ENV,
            source,
        }),
    }
}

pub fn init_logging() -> Result<(), LoggingError> {
    let format = format_from_env()?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let fmt_layer = match format {
        LogFormat::Json => fmt_layer.json().boxed(),
        LogFormat::Human => fmt_layer.boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}
