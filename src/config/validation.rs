//! Configuration validation

use super::*;
use crate::error::{GatewayError, Result};

/// Accepted values for `logging.format`
const LOG_FORMATS: &[&str] = &["json", "compact", "pretty"];

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_vertex_config(&config.vertex)?;
    validate_generation_config(&config.generation)?;
    validate_analysis_config(&config.analysis)?;
    validate_logging_config(&config.logging)?;
    validate_server_config(&config.server)?;
    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Validate Vertex AI configuration
fn validate_vertex_config(config: &VertexConfig) -> Result<()> {
    if config.project.trim().is_empty() {
        return Err(GatewayError::Config(
            "Vertex project is required (set GOOGLE_CLOUD_PROJECT)".to_string()
        ));
    }

    if config.location.trim().is_empty() {
        return Err(GatewayError::Config(
            "Vertex location cannot be empty".to_string()
        ));
    }

    if let Some(endpoint) = &config.api_endpoint {
        if !is_http_url(endpoint) {
            return Err(GatewayError::Config(
                "Vertex API endpoint must start with http:// or https://".to_string()
            ));
        }
    }

    if config.access_token.is_none() && !is_http_url(&config.metadata_url) {
        return Err(GatewayError::Config(
            "Metadata server URL must start with http:// or https://".to_string()
        ));
    }

    if config.timeout_secs == 0 {
        return Err(GatewayError::Config(
            "Vertex timeout must be greater than 0".to_string()
        ));
    }

    if config.timeout_secs > 300 {
        return Err(GatewayError::Config(
            "Vertex timeout too large (max: 300 seconds)".to_string()
        ));
    }

    Ok(())
}

/// Validate generation configuration
fn validate_generation_config(config: &GenerationConfig) -> Result<()> {
    if config.model.trim().is_empty() {
        return Err(GatewayError::Config(
            "Generation model cannot be empty".to_string()
        ));
    }

    if config.styleco_instruction_file.trim().is_empty() {
        return Err(GatewayError::Config(
            "Styleco instruction file name cannot be empty".to_string()
        ));
    }

    if config.max_concurrency == 0 {
        return Err(GatewayError::Config(
            "Generation max concurrency must be greater than 0".to_string()
        ));
    }

    if config.max_concurrency > 64 {
        return Err(GatewayError::Config(
            "Generation max concurrency too large (max: 64)".to_string()
        ));
    }

    Ok(())
}

/// Validate analysis configuration
fn validate_analysis_config(config: &AnalysisConfig) -> Result<()> {
    if config.default_model.trim().is_empty() {
        return Err(GatewayError::Config(
            "Analysis default model cannot be empty".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if !LOG_FORMATS.contains(&config.format.as_str()) {
        return Err(GatewayError::Config(
            format!("Unknown log format '{}' (expected one of {:?})", config.format, LOG_FORMATS)
        ));
    }

    Ok(())
}

/// Validate server configuration
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(GatewayError::Config(
            "Server port cannot be 0".to_string()
        ));
    }

    if config.host.is_empty() {
        return Err(GatewayError::Config(
            "Server host cannot be empty".to_string()
        ));
    }

    if config.max_body_size_mb == 0 || config.max_body_size_mb > 100 {
        return Err(GatewayError::Config(
            "Max body size must be between 1 and 100 MB".to_string()
        ));
    }

    Ok(())
}
