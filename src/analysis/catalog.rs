//! Static pricing and context window tables

use super::models::{ContextWindowEntry, PricingEntry};
use crate::error::{GatewayError, Result};
use std::collections::HashMap;
use tracing::warn;

/// Built-in rows: (model, input $/1M, output $/1M, context window tokens)
/// See https://cloud.google.com/vertex-ai/generative-ai/pricing
const BUILTIN_MODELS: &[(&str, f64, f64, u64)] = &[
    ("gemini-2.5-flash", 0.30, 2.50, 1_000_000),
    ("gemini-2.5-flash-lite", 0.10, 0.40, 1_000_000),
    ("gemini-2.5-pro", 1.25, 10.00, 1_000_000),
    ("gemini-2.0-flash", 0.10, 0.40, 1_000_000),
    ("gemini-2.0-flash-lite", 0.075, 0.30, 1_000_000),
];

/// Read-only model tables with a designated default model.
///
/// Lookups for unknown models resolve to the default model's entry.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    pricing: HashMap<String, PricingEntry>,
    context_windows: HashMap<String, ContextWindowEntry>,
    default_model: String,
}

impl ModelCatalog {
    /// Build a catalog. The default model must appear in both tables and
    /// every context window must be non-zero.
    pub fn new(
        pricing: Vec<PricingEntry>,
        context_windows: Vec<ContextWindowEntry>,
        default_model: impl Into<String>,
    ) -> Result<Self> {
        let default_model = default_model.into();

        if let Some(entry) = context_windows.iter().find(|e| e.max_tokens == 0) {
            return Err(GatewayError::Config(format!(
                "Context window for model '{}' must be greater than 0",
                entry.model_name
            )));
        }

        let pricing: HashMap<_, _> = pricing
            .into_iter()
            .map(|e| (e.model_name.clone(), e))
            .collect();
        let context_windows: HashMap<_, _> = context_windows
            .into_iter()
            .map(|e| (e.model_name.clone(), e))
            .collect();

        if !pricing.contains_key(&default_model) {
            return Err(GatewayError::Config(format!(
                "Default model '{}' has no pricing entry",
                default_model
            )));
        }
        if !context_windows.contains_key(&default_model) {
            return Err(GatewayError::Config(format!(
                "Default model '{}' has no context window entry",
                default_model
            )));
        }

        Ok(Self {
            pricing,
            context_windows,
            default_model,
        })
    }

    /// Built-in Gemini tables with the given default model
    pub fn builtin(default_model: impl Into<String>) -> Result<Self> {
        let pricing = BUILTIN_MODELS
            .iter()
            .map(|&(name, input, output, _)| PricingEntry {
                model_name: name.to_string(),
                input_price_per_million_tokens: input,
                output_price_per_million_tokens: output,
            })
            .collect();
        let context_windows = BUILTIN_MODELS
            .iter()
            .map(|&(name, _, _, max_tokens)| ContextWindowEntry {
                model_name: name.to_string(),
                max_tokens,
            })
            .collect();

        Self::new(pricing, context_windows, default_model)
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Whether the model has its own pricing entry
    pub fn is_known(&self, model: &str) -> bool {
        self.pricing.contains_key(model)
    }

    /// Number of priced models
    pub fn len(&self) -> usize {
        self.pricing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pricing.is_empty()
    }

    /// Pricing for `model`, falling back to the default model
    pub fn pricing_for(&self, model: &str) -> &PricingEntry {
        match self.pricing.get(model) {
            Some(entry) => entry,
            None => {
                warn!(
                    "No pricing for model '{}', using '{}'",
                    model, self.default_model
                );
                &self.pricing[&self.default_model]
            }
        }
    }

    /// Context window for `model`, falling back to the default model
    pub fn context_window_for(&self, model: &str) -> &ContextWindowEntry {
        match self.context_windows.get(model) {
            Some(entry) => entry,
            None => {
                warn!(
                    "No context window for model '{}', using '{}'",
                    model, self.default_model
                );
                &self.context_windows[&self.default_model]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricing(name: &str, input: f64) -> PricingEntry {
        PricingEntry {
            model_name: name.to_string(),
            input_price_per_million_tokens: input,
            output_price_per_million_tokens: input * 4.0,
        }
    }

    fn window(name: &str, max_tokens: u64) -> ContextWindowEntry {
        ContextWindowEntry {
            model_name: name.to_string(),
            max_tokens,
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = ModelCatalog::builtin("gemini-2.5-flash").unwrap();

        assert_eq!(catalog.default_model(), "gemini-2.5-flash");
        assert_eq!(catalog.len(), BUILTIN_MODELS.len());
        assert_eq!(catalog.pricing_for("gemini-2.0-flash").input_price_per_million_tokens, 0.10);
        assert_eq!(catalog.context_window_for("gemini-2.5-pro").max_tokens, 1_000_000);
    }

    #[test]
    fn test_unknown_model_falls_back_to_default() {
        let catalog = ModelCatalog::new(
            vec![pricing("default", 0.30), pricing("other", 2.0)],
            vec![window("default", 1_000), window("other", 50)],
            "default",
        )
        .unwrap();

        assert!(!catalog.is_known("mystery"));
        assert_eq!(catalog.pricing_for("mystery").model_name, "default");
        assert_eq!(catalog.context_window_for("mystery").max_tokens, 1_000);
        assert_eq!(catalog.pricing_for("other").input_price_per_million_tokens, 2.0);
    }

    #[test]
    fn test_tables_fall_back_independently() {
        let catalog = ModelCatalog::new(
            vec![pricing("default", 0.30), pricing("priced-only", 1.0)],
            vec![window("default", 1_000)],
            "default",
        )
        .unwrap();

        assert_eq!(catalog.pricing_for("priced-only").input_price_per_million_tokens, 1.0);
        assert_eq!(catalog.context_window_for("priced-only").model_name, "default");
    }

    #[test]
    fn test_default_model_must_exist() {
        assert!(ModelCatalog::builtin("gemini-9-ultra").is_err());
        assert!(ModelCatalog::new(vec![pricing("a", 1.0)], vec![window("b", 10)], "a").is_err());
    }

    #[test]
    fn test_zero_context_window_rejected() {
        let result = ModelCatalog::new(
            vec![pricing("default", 0.30)],
            vec![window("default", 0)],
            "default",
        );

        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}
