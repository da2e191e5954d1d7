//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("client.nick is required")]
    MissingNick,
    #[error("client.nick must not contain spaces or control characters, got '{0}'")]
    InvalidNick(String),
    #[error("ctcp.reply_queue_size must be positive")]
    ZeroQueueSize,
    #[error("ctcp.reply_rate must be a positive number of seconds, got {0}")]
    InvalidReplyRate(f64),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let nick = &config.client.nick;
    if nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if nick.chars().any(|c| c == ' ' || c.is_control()) {
        errors.push(ValidationError::InvalidNick(nick.clone()));
    }

    if config.ctcp.reply_queue_size == 0 {
        errors.push(ValidationError::ZeroQueueSize);
    }

    let rate = config.ctcp.reply_rate;
    if !rate.is_finite() || rate <= 0.0 {
        errors.push(ValidationError::InvalidReplyRate(rate));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_queue_and_rate_both_reported() {
        let toml = r#"
[ctcp]
reply_queue_size = 0
reply_rate = 0.0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroQueueSize)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidReplyRate(_))));
    }

    #[test]
    fn test_negative_rate_fails() {
        let toml = r#"
[ctcp]
reply_rate = -0.5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidReplyRate(_))));
    }

    #[test]
    fn test_nick_checks() {
        let empty: Config = toml::from_str("[client]\nnick = \"\"").unwrap();
        let errors = validate(&empty).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingNick)));

        let spaced: Config = toml::from_str("[client]\nnick = \"two words\"").unwrap();
        let errors = validate(&spaced).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidNick(_))));
    }
}
