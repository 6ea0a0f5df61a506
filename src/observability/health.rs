//! Health check endpoints and monitoring

use crate::analysis::ModelCatalog;
use crate::gemini::GenerativeModel;
use crate::generation::SystemInstructions;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Upstream probe timeout
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Health status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,

    /// Health status
    pub status: HealthStatus,

    /// Optional message
    pub message: Option<String>,

    /// Response time in milliseconds
    pub response_time_ms: Option<u64>,
}

impl ComponentHealth {
    fn new(name: &str, status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: Some(message.into()),
            response_time_ms: None,
        }
    }

    fn timed(mut self, start: Instant) -> Self {
        self.response_time_ms = Some(start.elapsed().as_millis() as u64);
        self
    }
}

/// Overall system health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    /// Overall status
    pub status: HealthStatus,

    /// Uptime in seconds
    pub uptime_secs: u64,

    /// Component health checks
    pub components: Vec<ComponentHealth>,

    /// Timestamp
    pub timestamp: i64,
}

/// Cached health check result
#[derive(Debug, Clone)]
struct CachedHealth {
    result: SystemHealth,
    cached_at: Instant,
}

/// Health checker with caching
pub struct HealthChecker {
    start_time: Instant,
    model: Option<(Arc<dyn GenerativeModel>, String)>,
    instructions: Option<Arc<SystemInstructions>>,
    catalog: Option<Arc<ModelCatalog>>,
    cached_result: Arc<RwLock<Option<CachedHealth>>>,
    cache_ttl: Duration,
}

impl HealthChecker {
    /// Create a new health checker with default 30-second cache TTL
    pub fn new() -> Self {
        Self::with_cache_ttl(Duration::from_secs(30))
    }

    /// Create a new health checker with custom cache TTL
    pub fn with_cache_ttl(cache_ttl: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            model: None,
            instructions: None,
            catalog: None,
            cached_result: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    /// Probe the model service by counting tokens for `probe_model`
    pub fn with_model_probe(
        mut self,
        model: Arc<dyn GenerativeModel>,
        probe_model: impl Into<String>,
    ) -> Self {
        self.model = Some((model, probe_model.into()));
        self
    }

    /// Set system instructions for health checks
    pub fn with_instructions(mut self, instructions: Arc<SystemInstructions>) -> Self {
        self.instructions = Some(instructions);
        self
    }

    /// Set model catalog for health checks
    pub fn with_catalog(mut self, catalog: Arc<ModelCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Check overall system health with caching
    pub async fn check_health(&self) -> SystemHealth {
        {
            let cached = self.cached_result.read().await;
            if let Some(cached_health) = &*cached {
                if cached_health.cached_at.elapsed() < self.cache_ttl {
                    debug!("Returning cached health check result");
                    return cached_health.result.clone();
                }
            }
        }

        debug!("Performing fresh health check");
        let health = self.perform_health_check().await;

        let mut cached = self.cached_result.write().await;
        *cached = Some(CachedHealth {
            result: health.clone(),
            cached_at: Instant::now(),
        });

        health
    }

    /// Perform actual health check (uncached)
    async fn perform_health_check(&self) -> SystemHealth {
        let components = vec![
            self.check_model_service().await,
            self.check_instructions(),
            self.check_catalog(),
        ];

        let status = if components.iter().all(|c| c.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        };

        SystemHealth {
            status,
            uptime_secs: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Check the model service with a tiny token count
    async fn check_model_service(&self) -> ComponentHealth {
        const NAME: &str = "model_service";
        let start = Instant::now();

        let Some((model, probe_model)) = &self.model else {
            return ComponentHealth::new(NAME, HealthStatus::Degraded, "Not configured");
        };

        match tokio::time::timeout(PROBE_TIMEOUT, model.count_tokens(probe_model, "ping")).await {
            Ok(Ok(_)) => {
                ComponentHealth::new(NAME, HealthStatus::Healthy, "Service operational").timed(start)
            }
            Ok(Err(e)) => {
                let message = format!("Service error: {}", e);
                ComponentHealth::new(NAME, HealthStatus::Unhealthy, message).timed(start)
            }
            Err(_) => ComponentHealth {
                response_time_ms: Some(PROBE_TIMEOUT.as_millis() as u64),
                ..ComponentHealth::new(NAME, HealthStatus::Unhealthy, "Health check timeout")
            },
        }
    }

    fn check_instructions(&self) -> ComponentHealth {
        const NAME: &str = "system_instructions";

        match &self.instructions {
            Some(instructions) if !instructions.styleco().trim().is_empty() => ComponentHealth::new(
                NAME,
                HealthStatus::Healthy,
                format!("Loaded ({} bytes)", instructions.styleco().len()),
            ),
            Some(_) => {
                ComponentHealth::new(NAME, HealthStatus::Degraded, "Styleco instruction is empty")
            }
            None => ComponentHealth::new(NAME, HealthStatus::Degraded, "Not configured"),
        }
    }

    fn check_catalog(&self) -> ComponentHealth {
        const NAME: &str = "model_catalog";

        match &self.catalog {
            Some(catalog) => ComponentHealth::new(
                NAME,
                HealthStatus::Healthy,
                format!("{} models, default {}", catalog.len(), catalog.default_model()),
            ),
            None => ComponentHealth::new(NAME, HealthStatus::Degraded, "Not configured"),
        }
    }

    /// Readiness check
    pub async fn readiness(&self) -> bool {
        let health = self.check_health().await;
        health.status != HealthStatus::Unhealthy
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}
