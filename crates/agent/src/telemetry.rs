//! Tracing subscriber setup

use patient_intake_config::ObservabilityConfig;
use tracing_subscriber::prelude::*;

use crate::AgentError;

/// Install the global subscriber
///
/// `RUST_LOG` overrides the configured level. Fails if a global subscriber
/// is already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), AgentError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.log_level.to_lowercase();
        format!("patient_intake={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    subscriber
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AgentError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_fails() {
        let config = ObservabilityConfig {
            log_level: "debug".to_string(),
            log_json: true,
        };
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(AgentError::Telemetry(_))));
    }
}
