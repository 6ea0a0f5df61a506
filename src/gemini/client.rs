//! Vertex AI client for Gemini generation and token counting

use super::{models::*, AccessTokenProvider, GenerationRequest, GenerativeModel};
use crate::config::VertexConfig;
use crate::error::{GatewayError, Result, UpstreamError};
use crate::observability::MetricsCollector;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Client for Gemini models published on Vertex AI
pub struct VertexClient {
    config: VertexConfig,
    http_client: Client,
    credentials: AccessTokenProvider,
    metrics: Option<Arc<MetricsCollector>>,
}

impl VertexClient {
    /// Create a new Vertex AI client
    pub fn new(config: VertexConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| GatewayError::UpstreamUnavailable(UpstreamError::Network(e)))?;

        Ok(Self::with_http_client(config, http_client))
    }

    /// Create client with custom HTTP client
    pub fn with_http_client(config: VertexConfig, http_client: Client) -> Self {
        let credentials = AccessTokenProvider::from_config(&config, http_client.clone());

        info!(
            "Initialized Vertex AI client for project={} location={}",
            config.project, config.location
        );

        Self {
            config,
            http_client,
            credentials,
            metrics: None,
        }
    }

    /// Record upstream latency and failures
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// API base URL for the configured location
    fn base_url(&self) -> String {
        match &self.config.api_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None if self.config.location == "global" => {
                "https://aiplatform.googleapis.com".to_string()
            }
            None => format!("https://{}-aiplatform.googleapis.com", self.config.location),
        }
    }

    /// Full URL of a model method, e.g. `generateContent`
    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:{}",
            self.base_url(),
            self.config.project,
            self.config.location,
            model,
            method
        )
    }

    /// POST a JSON body to a model method and decode the reply
    async fn call<Req, Resp>(&self, model: &str, method: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send,
    {
        let started = Instant::now();
        let result = self.send(model, method, body).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_upstream_call(started.elapsed(), result.is_ok());
        }

        result
    }

    async fn send<Req, Resp>(&self, model: &str, method: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send,
    {
        let token = self.credentials.access_token().await?;
        let url = self.model_url(model, method);
        debug!("Calling {} on model {}", method, model);

        let response = self.http_client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Network error calling {}: {}", method, e);
                UpstreamError::from_transport(e, self.config.timeout_secs)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("Vertex AI error {} on {}: {}", status, method, error_text);

            let err = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    UpstreamError::AuthenticationFailed
                }
                StatusCode::TOO_MANY_REQUESTS => UpstreamError::QuotaExceeded,
                _ => UpstreamError::Api {
                    status: status.as_u16(),
                    message: error_text,
                },
            };
            return Err(err.into());
        }

        let decoded = response
            .json::<Resp>()
            .await
            .map_err(|e| {
                error!("Failed to parse {} response: {}", method, e);
                UpstreamError::from_transport(e, self.config.timeout_secs)
            })?;

        Ok(decoded)
    }
}

#[async_trait]
impl GenerativeModel for VertexClient {
    async fn count_tokens(&self, model: &str, text: &str) -> Result<u64> {
        let request = CountTokensRequest::for_text(text);
        let response: CountTokensResponse = self.call(model, "countTokens", &request).await?;

        if let Some(metrics) = &self.metrics {
            metrics.record_tokens_counted(response.total_tokens);
        }

        debug!("Counted {} tokens for model {}", response.total_tokens, model);
        Ok(response.total_tokens)
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let body = GenerateContentRequest::from(&request);
        let response: GenerateContentResponse =
            self.call(&request.model, "generateContent", &body).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                "Generation on {} used {} prompt + {} candidate tokens",
                request.model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        match response.text() {
            Some(text) => Ok(text),
            None => {
                let reason = response
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .unwrap_or_else(|| "no candidates".to_string());
                warn!("Model {} returned no text ({})", request.model, reason);
                Err(UpstreamError::EmptyResponse.into())
            }
        }
    }
}
