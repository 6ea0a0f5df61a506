//! Data models for prompt token analysis

use serde::{Deserialize, Serialize};

/// Per-model token pricing in USD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub model_name: String,

    /// USD per one million input tokens
    pub input_price_per_million_tokens: f64,

    /// USD per one million output tokens; not used for prompt-only analysis
    pub output_price_per_million_tokens: f64,
}

/// Per-model context window size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextWindowEntry {
    pub model_name: String,
    pub max_tokens: u64,
}

/// Token usage, cost, and context window report for a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAnalysisResponse {
    pub token_count: u64,
    pub estimated_cost_usd: Option<f64>,
    pub context_usage_percent: Option<f64>,
    pub warnings: Option<Vec<String>>,
}

impl TokenAnalysisResponse {
    /// Warnings as a slice, empty when absent
    pub fn warnings(&self) -> &[String] {
        self.warnings.as_deref().unwrap_or(&[])
    }
}
