//! API request handlers

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use super::models::*;
use crate::{
    analysis::TokenAnalyzer,
    generation::{ResponseGenerator, SystemInstructions},
    observability::{HealthChecker, MetricsCollector},
};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ResponseGenerator>,
    pub analyzer: Arc<TokenAnalyzer>,
    pub instructions: Arc<SystemInstructions>,
    pub health_checker: Arc<HealthChecker>,
    pub metrics: Arc<MetricsCollector>,
}

/// Relay a prompt to Gemini
pub async fn hello_gemini(
    State(state): State<AppState>,
    Json(req): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, ApiError> {
    let response = state.generator.generate_simple(&req.prompt).await?;
    Ok(Json(PromptResponse { response }))
}

/// StyleCo customer service assistant
pub async fn styleco_assistant(
    State(state): State<AppState>,
    Json(req): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, ApiError> {
    let response = state
        .generator
        .generate_with_instruction(&req.prompt, state.instructions.styleco())
        .await?;
    Ok(Json(PromptResponse { response }))
}

/// Same StyleCo prompt at several temperatures
pub async fn styleco_assistant_temperature(
    State(state): State<AppState>,
    Json(req): Json<TemperatureRequest>,
) -> Result<Json<TemperatureResponse>, ApiError> {
    info!("Temperature sweep over {} values", req.temperatures.len());

    let responses = state
        .generator
        .generate_with_temperatures(&req.prompt, state.instructions.styleco(), &req.temperatures)
        .await?;

    Ok(Json(TemperatureResponse {
        prompt: req.prompt,
        responses,
    }))
}

/// Token usage, estimated cost, and context window usage of a prompt
pub async fn token_analysis(
    State(state): State<AppState>,
    Json(req): Json<TokenAnalysisRequest>,
) -> Result<Json<TokenAnalysisResponse>, ApiError> {
    let report = match req.model.as_deref() {
        Some(model) => state.analyzer.analyze(&req.prompt, model).await?,
        None => state.analyzer.analyze_default(&req.prompt).await?,
    };
    Ok(Json(report))
}
