//! Logging subscriber initialisation.

use std::io;

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::{LevelFilter, ParseError},
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::{LogFormat, LoggingConfig};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] TryInitError),

    /// The log level is neither a level nor a list of filter directives.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
}

/// Install the global subscriber. Logs go to stderr so stdout stays free for tables.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), LoggingError> {
    match config.log_format {
        LogFormat::Compact => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

/// A bare level applies to this crate only; anything else is used as directives.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    let level = config.log_level.trim();

    let directives = match level.parse::<LevelFilter>() {
        Ok(_) => format!("warn,harvest={level}"),
        Err(_err) => level.to_string(),
    };

    Ok(EnvFilter::try_new(directives)?)
}

fn init_with_layer<L>(config: &LoggingConfig, fmt_layer: L) -> Result<(), LoggingError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config)?)
        .try_init()?;

    Ok(())
}
