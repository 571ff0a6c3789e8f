//! Structured logging using tracing.
//!
//! Logs are written to stderr so that tools printing reports on stdout stay
//! machine-readable.

use std::env;
use std::str::FromStr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{CoreError, CoreResult};

/// Output format of the log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    Compact,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(CoreError::Config(format!("unknown log format '{}'", other))),
        }
    }
}

/// Configuration for initializing logging
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Service name recorded in the start-up event
    pub service_name: String,
    /// Log level filter (e.g., "info,serenity_junit5=debug"), used when RUST_LOG is unset
    pub log_filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "serenity".to_string(),
            log_filter: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LoggingConfig {
    /// Defaults overridden by `SERENITY_LOG` and `SERENITY_LOG_FORMAT`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(filter) = env::var("SERENITY_LOG") {
            config.log_filter = filter;
        }

        if let Ok(format) = env::var("SERENITY_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => config.format = format,
                Err(_) => warn!("Invalid SERENITY_LOG_FORMAT value: {}", format),
            }
        }

        config
    }
}

/// Install the global tracing subscriber
pub fn init_logging(config: &LoggingConfig) -> CoreResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format {
        LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => subscriber
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    installed.map_err(|e| CoreError::Logging(e.to_string()))?;

    info!(
        service_name = %config.service_name,
        log_format = ?config.format,
        "Logging initialized"
    );

    Ok(())
}
