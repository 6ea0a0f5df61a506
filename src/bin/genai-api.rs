//! GenAI API Server Binary
//!
//! Loads configuration, wires the Vertex AI client into the generation and
//! token analysis services, and serves the HTTP API.

use anyhow::Context;
use genai_api::{
    analysis::{ModelCatalog, TokenAnalyzer},
    api::{build_router, AppState},
    config::Config,
    gemini::{GenerativeModel, VertexClient},
    generation::{ResponseGenerator, SystemInstructions},
    observability::{init_observability, HealthChecker, MetricsCollector},
    server::start_server,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path))?;

    init_observability(&config.logging.level, &config.logging.format);

    info!("Starting GenAI API");
    info!(
        project = %config.vertex.project,
        location = %config.vertex.location,
        model = %config.generation.model,
        "Configuration loaded and validated"
    );

    let metrics = Arc::new(MetricsCollector::new());

    let model: Arc<dyn GenerativeModel> = Arc::new(
        VertexClient::new(config.vertex.clone())
            .context("building Vertex AI client")?
            .with_metrics(metrics.clone()),
    );
    info!("Vertex AI client initialized");

    let catalog = Arc::new(
        ModelCatalog::builtin(config.analysis.default_model.clone())
            .context("building model catalog")?,
    );

    let instructions = Arc::new(
        SystemInstructions::load(
            &config.generation.instructions_dir,
            &config.generation.styleco_instruction_file,
        )
        .await
        .context("loading system instructions")?,
    );
    info!("System instructions loaded from {}", instructions.source().display());

    let generator = Arc::new(ResponseGenerator::new(
        model.clone(),
        config.generation.model.clone(),
        config.generation.max_concurrency,
    ));
    let analyzer = Arc::new(TokenAnalyzer::new(model.clone(), catalog.clone()));

    let health_checker = Arc::new(
        HealthChecker::new()
            .with_model_probe(model, config.analysis.default_model.clone())
            .with_instructions(instructions.clone())
            .with_catalog(catalog),
    );

    let app_state = AppState {
        generator,
        analyzer,
        instructions,
        health_checker,
        metrics,
    };

    let app = build_router(app_state, config.max_body_bytes());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    start_server(&addr, app).await.context("running HTTP server")?;

    Ok(())
}
