use std::env;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOGGING_ENV_VAR: &str = "TXWATCH_LOGGING";
const DEFAULT_FILTER: &str = "txwatch=debug";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("TXWATCH_LOGGING must be 'true' or 'false', got '{0}'")]
    InvalidToggle(String),
}

/// Parse the value of the logging toggle; unset means disabled
pub fn logging_toggle(value: Option<&str>) -> Result<bool, LoggingError> {
    match value {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(LoggingError::InvalidToggle(other.to_string())),
    }
}

/// Initializes diagnostics based on the TXWATCH_LOGGING environment variable.
/// - If TXWATCH_LOGGING=true or `force` is set, diagnostics are written to stderr.
/// - If TXWATCH_LOGGING=false or not set, only the report lines are printed.
/// - RUST_LOG narrows or widens the filter once diagnostics are on.
///
/// Installing the subscriber is best-effort, so calling this twice is harmless.
pub fn init_logging(force: bool) -> Result<(), LoggingError> {
    let toggle = env::var(LOGGING_ENV_VAR).ok();
    let enabled = force || logging_toggle(toggle.as_deref())?;
    if !enabled {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .with(env_filter)
        .try_init();
    Ok(())
}
