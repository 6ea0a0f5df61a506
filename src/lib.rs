//! GenAI API - HTTP endpoints over Gemini on Vertex AI
//!
//! A small service that relays prompts to Gemini models, answers as the
//! StyleCo customer service assistant, runs the same prompt across several
//! sampling temperatures, and reports token usage with cost and context
//! window estimates.
//!
//! ## Features
//!
//! - **Pluggable model service**: every handler talks to a [`gemini::GenerativeModel`]
//! - **Token analysis**: pricing and context window tables with a default-model fallback
//! - **Temperature sweeps**: bounded concurrency, results in request order
//! - **Observability**: structured logging, Prometheus metrics and health checks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use genai_api::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load("config.toml")?;
//!
//!     let model: Arc<dyn GenerativeModel> = Arc::new(VertexClient::new(config.vertex.clone())?);
//!     let catalog = Arc::new(ModelCatalog::builtin(config.analysis.default_model.clone())?);
//!     let analyzer = TokenAnalyzer::new(model, catalog);
//!
//!     let report = analyzer.analyze_default("How long is this prompt?").await?;
//!     println!("{} tokens", report.token_count);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod gemini;
pub mod generation;
pub mod observability;
pub mod server;

pub use config::Config;
pub use error::{GatewayError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analysis::{ModelCatalog, TokenAnalyzer, TokenAnalysisResponse};
    pub use crate::api::{build_router, AppState};
    pub use crate::config::Config;
    pub use crate::error::{GatewayError, Result, UpstreamError};
    pub use crate::gemini::{GenerationRequest, GenerativeModel, VertexClient};
    pub use crate::generation::{ResponseGenerator, SystemInstructions, TemperatureResponseItem};
    pub use crate::observability::{HealthChecker, MetricsCollector};
}
