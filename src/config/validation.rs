//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::{Config, Limits};
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.max_line_len must be greater than zero")]
    ZeroLineLength,
    #[error("interpreter.terminator must be exactly one byte, got {0:?}")]
    InvalidTerminator(String),
    #[error("interpreter.error_queue_capacity must be greater than zero")]
    ZeroQueueCapacity,
    #[error("instrument.{setting}: min ({min}) exceeds max ({max})")]
    InvertedLimits {
        setting: &'static str,
        min: f64,
        max: f64,
    },
    #[error("instrument.{setting}: default ({default}) outside {min}..={max}")]
    DefaultOutOfRange {
        setting: &'static str,
        default: f64,
        min: f64,
        max: f64,
    },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.max_line_len == 0 {
        errors.push(ValidationError::ZeroLineLength);
    }

    if config.interpreter.terminator_byte().is_err() {
        errors.push(ValidationError::InvalidTerminator(
            config.interpreter.terminator.clone(),
        ));
    }
    if config.interpreter.error_queue_capacity == Some(0) {
        errors.push(ValidationError::ZeroQueueCapacity);
    }

    check_limits("frequency", &config.instrument.frequency, &mut errors);
    check_limits("voltage", &config.instrument.voltage, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_limits(setting: &'static str, limits: &Limits, errors: &mut Vec<ValidationError>) {
    if limits.min > limits.max {
        errors.push(ValidationError::InvertedLimits {
            setting,
            min: limits.min,
            max: limits.max,
        });
    } else if !limits.contains(limits.default) {
        errors.push(ValidationError::DefaultOutOfRange {
            setting,
            default: limits.default,
            min: limits.min,
            max: limits.max,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_config() -> String {
        r#"
[server]
name = "test.instrument"
listen = "127.0.0.1:5025"
"#
        .to_string()
    }

    #[test]
    fn test_valid_config_passes() {
        let config: Config = toml::from_str(&minimal_valid_config()).unwrap();
        assert!(validate(&config).is_ok());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multi_byte_terminator_fails() {
        let toml = r#"
[server]
listen = "127.0.0.1:5025"

[interpreter]
terminator = "\r\n"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidTerminator(_))));
    }

    #[test]
    fn test_zero_sizes_fail() {
        let toml = r#"
[server]
listen = "127.0.0.1:5025"
max_line_len = 0

[interpreter]
error_queue_capacity = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroLineLength)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroQueueCapacity)));
    }

    #[test]
    fn test_bad_limits_fail() {
        let toml = r#"
[server]
listen = "127.0.0.1:5025"

[instrument.frequency]
min = 100.0
max = 10.0
default = 50.0

[instrument.voltage]
min = 0.0
max = 5.0
default = 6.0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvertedLimits {
                setting: "frequency",
                ..
            }
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::DefaultOutOfRange {
                setting: "voltage",
                ..
            }
        )));
    }
}
