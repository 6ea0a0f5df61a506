//! API route configuration

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::handlers::{self, AppState};
use crate::observability::{HealthStatus, MetricsCollector};

/// Build the complete API router with middleware
pub fn build_router(app_state: AppState, max_body_bytes: usize) -> Router {
    let public_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(app_state.clone());

    let api_routes = Router::new()
        .route("/hello_gemini", post(handlers::hello_gemini))
        .route("/styleco_assistant", post(handlers::styleco_assistant))
        .route(
            "/styleco_assistant_temperature",
            post(handlers::styleco_assistant_temperature),
        )
        .route("/token_analysis", post(handlers::token_analysis))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    app_state.metrics.clone(),
                    request_metrics_middleware,
                )),
        )
        .with_state(app_state);

    public_routes.merge(api_routes)
}

/// Root handler
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": "GenAI API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

fn health_status_code(status: &HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.health_checker.check_health().await;
    (health_status_code(&health.status), Json(health))
}

/// Liveness probe handler - always returns 200
async fn liveness_handler() -> impl IntoResponse {
    Json(json!({"status": "alive"}))
}

/// Readiness probe handler - checks if service is ready to serve traffic
async fn readiness_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.health_checker.readiness().await;
    let details = state.health_checker.check_health().await;

    let (status_code, readiness_status) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (status_code, Json(json!({"status": readiness_status, "details": details})))
}

/// Metrics handler
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.export_prometheus()
}

/// Request counting and latency middleware
async fn request_metrics_middleware(
    State(metrics): State<Arc<MetricsCollector>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    metrics.increment_active();

    let response = next.run(req).await;

    metrics.decrement_active();
    metrics.record_request(started.elapsed());
    if response.status().is_server_error() {
        metrics.record_error();
    }

    response
}
