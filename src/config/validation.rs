use crate::config::types::{ApiConfig, AuthConfig, ClientConfig, Config, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_client_config(&config.client)?;
    validate_auth_config(&config.auth)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates endpoint configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    validate_base_url("auth_base_url", &config.auth_base_url)?;
    validate_base_url("content_base_url", &config.content_base_url)?;

    if !(1..=300).contains(&config.timeout_secs) {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if !(1..=300).contains(&config.connect_timeout_secs) {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and 300, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates a base URL: must parse and use http or https
fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.platform.trim().is_empty() {
        return Err(ConfigError::Validation(
            "platform cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &AuthConfig) -> Result<(), ConfigError> {
    if config.token_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "token_prefix cannot be empty".to_string(),
        ));
    }

    if config.token_prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "token_prefix cannot contain whitespace, got '{}'",
            config.token_prefix
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if !(1..=255).contains(&config.name_max_length) {
        return Err(ConfigError::Validation(format!(
            "name_max_length must be between 1 and 255, got {}",
            config.name_max_length
        )));
    }

    Ok(())
}
