//! Configuration management for the GenAI API gateway

use serde::{Deserialize, Serialize};
use std::path::Path;
use secrecy::{Secret, ExposeSecret};

pub mod loader;
pub mod validation;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub vertex: VertexConfig,
    pub generation: GenerationConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

/// Configuration for reaching Gemini on Vertex AI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexConfig {
    /// Google Cloud project id
    #[serde(default)]
    pub project: String,

    /// Vertex AI region, or `global`
    #[serde(default = "default_location")]
    pub location: String,

    /// Override for the API base URL (defaults to the regional endpoint)
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// Static OAuth access token (secured). When unset, tokens come from the metadata server.
    #[serde(
        default,
        serialize_with = "serialize_optional_secret",
        deserialize_with = "deserialize_optional_secret"
    )]
    pub access_token: Option<Secret<String>>,

    /// Base URL of the GCE/Cloud Run metadata server
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Response generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model used for generation
    #[serde(default = "default_model")]
    pub model: String,

    /// Directory holding system instruction files
    #[serde(default = "default_instructions_dir")]
    pub instructions_dir: String,

    /// File name of the styleco customer service instruction
    #[serde(default = "default_styleco_instruction_file")]
    pub styleco_instruction_file: String,

    /// Maximum in-flight upstream calls for a temperature sweep
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// Token analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Model analysed when a request names none; also the pricing fallback
    #[serde(default = "default_model")]
    pub default_model: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Server host
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size")]
    pub max_body_size_mb: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_location() -> String { "europe-west1".to_string() }
fn default_metadata_url() -> String { "http://metadata.google.internal".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_model() -> String { "gemini-2.5-flash".to_string() }
fn default_instructions_dir() -> String { "instructions".to_string() }
fn default_styleco_instruction_file() -> String { "styleco_customer_service.txt".to_string() }
fn default_max_concurrency() -> usize { 4 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }
fn default_server_port() -> u16 { 8080 }
fn default_server_host() -> String { "0.0.0.0".to_string() }
fn default_max_body_size() -> usize { 1 } // 1 MB

impl Config {
    /// Load configuration from an optional TOML file plus environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Byte limit for request bodies
    pub fn max_body_bytes(&self) -> usize {
        self.server.max_body_size_mb * 1024 * 1024
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self {
            vertex: VertexConfig {
                project: std::env::var("GOOGLE_CLOUD_PROJECT").unwrap_or_default(),
                location: default_location(),
                api_endpoint: None,
                access_token: None,
                metadata_url: default_metadata_url(),
                timeout_secs: default_timeout(),
            },
            generation: GenerationConfig {
                model: default_model(),
                instructions_dir: default_instructions_dir(),
                styleco_instruction_file: default_styleco_instruction_file(),
                max_concurrency: default_max_concurrency(),
            },
            analysis: AnalysisConfig {
                default_model: default_model(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            server: ServerConfig {
                port: default_server_port(),
                host: default_server_host(),
                max_body_size_mb: default_max_body_size(),
            },
        }
    }
}

/// Custom serializer for Option<Secret<String>>
fn serialize_optional_secret<S>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Custom deserializer for Option<Secret<String>>
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.is_empty()).map(Secret::new))
}
