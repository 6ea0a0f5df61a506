//! Response generation pass-through to the model service

use super::models::TemperatureResponseItem;
use crate::error::{GatewayError, Result};
use crate::gemini::{GenerationRequest, GenerativeModel};
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Forwards prompts to a generative model and relays its text unchanged
pub struct ResponseGenerator {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    max_concurrency: usize,
}

impl ResponseGenerator {
    /// Create a generator for `model_name`; temperature sweeps run at most
    /// `max_concurrency` upstream calls at once
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        model_name: impl Into<String>,
        max_concurrency: usize,
    ) -> Self {
        let model_name = model_name.into();
        info!(
            "Response generator using model {} (max_concurrency={})",
            model_name, max_concurrency
        );

        Self {
            model,
            model_name,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Prompt only, default sampling
    #[instrument(skip_all)]
    pub async fn generate_simple(&self, prompt: &str) -> Result<String> {
        let request = GenerationRequest::new(&self.model_name, prompt);
        self.model.generate(request).await
    }

    /// Prompt with a system instruction, default sampling
    #[instrument(skip_all)]
    pub async fn generate_with_instruction(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String> {
        let request = GenerationRequest::new(&self.model_name, prompt)
            .with_system_instruction(system_instruction);
        self.model.generate(request).await
    }

    /// One independent call per temperature. Results follow input order and
    /// the first failure fails the whole sweep.
    #[instrument(skip_all, fields(temperatures = temperatures.len()))]
    pub async fn generate_with_temperatures(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperatures: &[f64],
    ) -> Result<Vec<TemperatureResponseItem>> {
        let requests: Vec<GenerationRequest> = temperatures
            .iter()
            .map(|&temperature| {
                GenerationRequest::new(&self.model_name, prompt)
                    .with_system_instruction(system_instruction)
                    .with_temperature(temperature)
            })
            .collect();

        let model = Arc::clone(&self.model);
        let items: Vec<TemperatureResponseItem> = stream::iter(requests)
            .map(move |request| {
                let model = Arc::clone(&model);
                async move {
                    let temperature = request.temperature.unwrap_or_default();
                    debug!("Generating at temperature {}", temperature);
                    let response = model.generate(request).await?;
                    Ok::<_, GatewayError>(TemperatureResponseItem { temperature, response })
                }
            })
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        Ok(items)
    }
}
