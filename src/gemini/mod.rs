//! Gemini model access via the Vertex AI REST API

pub mod auth;
pub mod client;
pub mod models;

pub use auth::AccessTokenProvider;
pub use client::VertexClient;
pub use models::{
    CountTokensRequest, CountTokensResponse, GenerateContentRequest, GenerateContentResponse,
};

use async_trait::async_trait;
use crate::error::Result;

/// A single text generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub temperature: Option<f64>,
}

impl GenerationRequest {
    /// Prompt-only request with default sampling
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: None,
            temperature: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Trait for generative model providers
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Count the tokens `text` occupies for `model`
    async fn count_tokens(&self, model: &str, text: &str) -> Result<u64>;

    /// Generate a text completion
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
