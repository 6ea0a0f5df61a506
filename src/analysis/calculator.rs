//! Token count, cost, and context window usage for prompts

use super::catalog::ModelCatalog;
use super::models::TokenAnalysisResponse;
use crate::error::Result;
use crate::gemini::GenerativeModel;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Usage above this percentage triggers the first warning
pub const APPROACHING_LIMIT_PERCENT: f64 = 80.0;

/// Usage above this percentage triggers the critical warning
pub const CRITICAL_LIMIT_PERCENT: f64 = 95.0;

pub const APPROACHING_LIMIT_WARNING: &str = "Approaching context limit (>80%)";
pub const CRITICAL_LIMIT_WARNING: &str = "Critical: Very close to context limit (>95%)";

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Round half away from zero to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Input cost in USD, rounded to 6 decimal places
pub fn estimate_cost(token_count: u64, input_price_per_million_tokens: f64) -> f64 {
    round_to(
        (token_count as f64 / TOKENS_PER_MILLION) * input_price_per_million_tokens,
        6,
    )
}

/// Share of the context window used, in percent rounded to 2 decimal places
pub fn context_usage_percent(token_count: u64, max_tokens: u64) -> f64 {
    round_to((token_count as f64 / max_tokens as f64) * 100.0, 2)
}

/// Threshold warnings for a usage percentage; the 80% warning always comes first
pub fn context_warnings(usage_percent: f64) -> Vec<String> {
    let mut warnings = Vec::new();
    if usage_percent > APPROACHING_LIMIT_PERCENT {
        warnings.push(APPROACHING_LIMIT_WARNING.to_string());
    }
    if usage_percent > CRITICAL_LIMIT_PERCENT {
        warnings.push(CRITICAL_LIMIT_WARNING.to_string());
    }
    warnings
}

/// Analyzes prompts against the model catalog using an external tokenizer
pub struct TokenAnalyzer {
    model: Arc<dyn GenerativeModel>,
    catalog: Arc<ModelCatalog>,
}

impl TokenAnalyzer {
    pub fn new(model: Arc<dyn GenerativeModel>, catalog: Arc<ModelCatalog>) -> Self {
        Self { model, catalog }
    }

    /// Analyze `prompt` for the catalog's default model
    pub async fn analyze_default(&self, prompt: &str) -> Result<TokenAnalysisResponse> {
        let model_name = self.catalog.default_model().to_string();
        self.analyze(prompt, &model_name).await
    }

    /// Count tokens for `prompt` and derive cost, context usage, and warnings.
    ///
    /// Unknown models are priced and sized as the default model.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn analyze(&self, prompt: &str, model_name: &str) -> Result<TokenAnalysisResponse> {
        let token_count = self.model.count_tokens(model_name, prompt).await?;

        let pricing = self.catalog.pricing_for(model_name);
        let estimated_cost_usd = estimate_cost(token_count, pricing.input_price_per_million_tokens);

        let window = self.catalog.context_window_for(model_name);
        let usage = context_usage_percent(token_count, window.max_tokens);
        let warnings = context_warnings(usage);

        debug!(
            "Analyzed prompt: tokens={} cost_usd={} usage={}% warnings={}",
            token_count,
            estimated_cost_usd,
            usage,
            warnings.len()
        );

        Ok(TokenAnalysisResponse {
            token_count,
            estimated_cost_usd: Some(estimated_cost_usd),
            context_usage_percent: Some(usage),
            warnings: Some(warnings),
        })
    }
}
