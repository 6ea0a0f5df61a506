//! OAuth access tokens for Vertex AI

use crate::config::VertexConfig;
use crate::error::{Result, UpstreamError};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Metadata server path for the default service account token
const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before they expire
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Where access tokens come from
enum TokenSource {
    Static(Secret<String>),
    MetadataServer { url: String },
}

/// Token response from the metadata server
#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: Secret<String>,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + REFRESH_MARGIN < self.expires_at
    }
}

/// Supplies bearer tokens, caching metadata server tokens until shortly before expiry
pub struct AccessTokenProvider {
    source: TokenSource,
    http_client: Client,
    timeout_secs: u64,
    cached: RwLock<Option<CachedToken>>,
}

impl AccessTokenProvider {
    /// Build a provider from Vertex configuration
    pub fn from_config(config: &VertexConfig, http_client: Client) -> Self {
        let source = match &config.access_token {
            Some(token) => {
                info!("Using configured static access token for Vertex AI");
                TokenSource::Static(Secret::new(token.expose_secret().clone()))
            }
            None => {
                info!("Using metadata server at {} for Vertex AI credentials", config.metadata_url);
                TokenSource::MetadataServer {
                    url: config.metadata_url.trim_end_matches('/').to_string(),
                }
            }
        };

        Self {
            source,
            http_client,
            timeout_secs: config.timeout_secs,
            cached: RwLock::new(None),
        }
    }

    /// Current access token
    pub async fn access_token(&self) -> Result<String> {
        let url = match &self.source {
            TokenSource::Static(token) => return Ok(token.expose_secret().clone()),
            TokenSource::MetadataServer { url } => url,
        };

        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.token.expose_secret().clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.token.expose_secret().clone());
        }

        let fresh = self.fetch_metadata_token(url).await?;
        let value = fresh.token.expose_secret().clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn fetch_metadata_token(&self, base_url: &str) -> Result<CachedToken> {
        debug!("Fetching access token from metadata server");

        let response = self.http_client
            .get(format!("{}{}", base_url, METADATA_TOKEN_PATH))
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| {
                error!("Metadata server unreachable: {}", e);
                UpstreamError::from_transport(e, self.timeout_secs)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Metadata server returned {}", status);
            let message = format!("metadata server returned {}", status);
            return Err(UpstreamError::Credentials(message).into());
        }

        let token: MetadataToken = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_transport(e, self.timeout_secs))?;

        debug!("Obtained access token valid for {}s", token.expires_in);

        Ok(CachedToken {
            token: Secret::new(token.access_token),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}
