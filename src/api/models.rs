//! Request and response bodies of the HTTP API

use serde::{Deserialize, Serialize};

pub use crate::analysis::TokenAnalysisResponse;
pub use crate::generation::TemperatureResponseItem;

/// A bare prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Generated text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResponse {
    pub response: String,
}

/// A prompt to run once per temperature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureRequest {
    pub prompt: String,

    #[serde(default = "default_temperatures")]
    pub temperatures: Vec<f64>,
}

fn default_temperatures() -> Vec<f64> {
    vec![0.0, 0.5, 1.0]
}

/// Responses of a temperature sweep, in request order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureResponse {
    pub prompt: String,
    pub responses: Vec<TemperatureResponseItem>,
}

/// Prompt to analyze; `model` defaults to the configured analysis model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenAnalysisRequest {
    pub prompt: String,

    #[serde(default)]
    pub model: Option<String>,
}

/// Generic error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
