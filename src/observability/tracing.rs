use thiserror::Error;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Install the global tracing subscriber with structured logging.
///
/// `RUST_LOG` takes precedence; otherwise `log_level` applies to this crate.
/// Fails if a global subscriber has already been set.
pub fn init_observability(
    service_name: &str,
    log_level: &str,
    enable_json_logging: bool,
) -> Result<(), ObservabilityError> {
    let env_filter = build_env_filter(log_level)?;

    let result = if enable_json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()
    };

    result.map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    info!(
        service = %service_name,
        json = enable_json_logging,
        "Observability initialized successfully"
    );
    Ok(())
}

/// Same as [`init_observability`], reading the settings from configuration
pub fn init_from_config(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    init_observability(
        &config.service_name,
        &config.log_level,
        config.enable_json_logging,
    )
}

fn build_env_filter(log_level: &str) -> Result<EnvFilter, ObservabilityError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = log_level.trim().to_lowercase();
    if !matches!(
        level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    ) {
        return Err(ObservabilityError::Config(format!(
            "Unknown log level '{}'",
            log_level
        )));
    }

    EnvFilter::try_new(format!("warn,motoshop_rs={}", level))
        .map_err(|e| ObservabilityError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_env_filter_rejects_unknown_level() {
        std::env::remove_var("RUST_LOG");
        match build_env_filter("loud") {
            Err(ObservabilityError::Config(message)) => assert!(message.contains("loud")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_env_filter_accepts_levels() {
        std::env::remove_var("RUST_LOG");
        for level in ["trace", "DEBUG", " info ", "warn", "error", "off"] {
            assert!(build_env_filter(level).is_ok(), "level {}", level);
        }
    }

    #[test]
    fn test_second_init_fails() {
        let _ = init_observability("motoshop-test", "debug", false);
        let second = init_observability("motoshop-test", "debug", true);

        assert!(matches!(second, Err(ObservabilityError::TracingInit(_))));
    }
}
