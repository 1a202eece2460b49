//! Configuration validation

use crate::schema::RawConfig;
use std::net::SocketAddr;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Invalid bind address '{value}': {message}")]
    InvalidBind { value: String, message: String },

    #[error("Invalid config extension '{0}': expected a bare extension like \"toml\"")]
    InvalidExtension(String),

    #[error("Runner error: {0}")]
    RunnerError(String),

    #[error("Version check error: {0}")]
    VersionCheckError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(bind) = &config.panel.bind
        && let Err(e) = bind.parse::<SocketAddr>()
    {
        errors.push(ValidationError::InvalidBind {
            value: bind.clone(),
            message: e.to_string(),
        });
    }

    if let Some(ext) = &config.panel.config_extension
        && (ext.is_empty() || ext.contains(['.', '/', '\\']))
    {
        errors.push(ValidationError::InvalidExtension(ext.clone()));
    }

    if let Some(program) = &config.runner.program
        && program.trim().is_empty()
    {
        errors.push(ValidationError::RunnerError("program cannot be empty".into()));
    }

    if let Some(url) = &config.version_check.url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        errors.push(ValidationError::VersionCheckError(format!(
            "url must be http(s): {}",
            url
        )));
    }

    if config.version_check.timeout_secs == Some(0) {
        errors.push(ValidationError::VersionCheckError(
            "timeout_secs must be greater than 0".into(),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> RawConfig {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn valid_config_has_no_errors() {
        let raw = parse(
            r#"
            config_version = 1
            [panel]
            bind = "127.0.0.1:3000"
            config_extension = "yaml"
            "#,
        );
        assert!(validate_config(&raw).is_empty());
    }

    #[test]
    fn reports_every_problem() {
        let raw = parse(
            r#"
            config_version = 1
            [panel]
            bind = "localhost"
            config_extension = ".toml"
            [runner]
            program = "  "
            [version_check]
            url = "ftp://example.com"
            timeout_secs = 0
            "#,
        );

        let errors = validate_config(&raw);
        assert_eq!(errors.len(), 5);
        assert!(matches!(errors[0], ValidationError::InvalidBind { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidExtension(_)));
        assert!(matches!(errors[2], ValidationError::RunnerError(_)));
    }
}
