//! End-to-end tests of the HTTP API against an in-process model double

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use genai_api::{
    analysis::{ModelCatalog, TokenAnalyzer},
    api::{build_router, AppState},
    error::{Result, UpstreamError},
    gemini::{GenerationRequest, GenerativeModel},
    generation::{ResponseGenerator, SystemInstructions},
    observability::{HealthChecker, MetricsCollector},
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const STYLECO: &str = "You are the StyleCo customer service assistant.";

/// Model double: fixed token count, echoing generation, optional failure
struct FakeModel {
    tokens: u64,
    fail: bool,
    fail_on_temperature: Option<f64>,
    tokenized_for: Mutex<Vec<String>>,
}

impl FakeModel {
    fn new(tokens: u64) -> Self {
        Self {
            tokens,
            fail: false,
            fail_on_temperature: None,
            tokenized_for: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self { fail: true, ..Self::new(0) }
    }
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn count_tokens(&self, model: &str, _text: &str) -> Result<u64> {
        if self.fail {
            return Err(UpstreamError::QuotaExceeded.into());
        }
        self.tokenized_for.lock().unwrap().push(model.to_string());
        Ok(self.tokens)
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let fails_here =
            request.temperature.is_some() && request.temperature == self.fail_on_temperature;
        if self.fail || fails_here {
            return Err(UpstreamError::Api {
                status: 500,
                message: "backend error".to_string(),
            }
            .into());
        }

        let mut text = request.prompt.clone();
        if let Some(instruction) = &request.system_instruction {
            text = format!("[{}] {}", instruction, text);
        }
        if let Some(temperature) = request.temperature {
            text = format!("{} @{}", text, temperature);
        }
        Ok(text)
    }
}

fn app_with(model: Arc<FakeModel>) -> Router {
    app_with_instruction(model, STYLECO)
}

fn app_with_instruction(model: Arc<FakeModel>, styleco: &str) -> Router {
    let model: Arc<dyn GenerativeModel> = model;
    let catalog = Arc::new(ModelCatalog::builtin("gemini-2.5-flash").unwrap());
    let instructions = Arc::new(SystemInstructions::from_text(styleco));

    let state = AppState {
        generator: Arc::new(ResponseGenerator::new(model.clone(), "gemini-2.5-flash", 2)),
        analyzer: Arc::new(TokenAnalyzer::new(model.clone(), catalog.clone())),
        instructions: instructions.clone(),
        health_checker: Arc::new(
            HealthChecker::new()
                .with_model_probe(model, "gemini-2.5-flash")
                .with_instructions(instructions)
                .with_catalog(catalog),
        ),
        metrics: Arc::new(MetricsCollector::new()),
    };

    build_router(state, 1024 * 1024)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_hello_gemini_relays_text() {
    let app = app_with(Arc::new(FakeModel::new(1)));

    let (status, body) = post_json(app, "/hello_gemini", json!({"prompt": "Hi there"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Hi there"}));
}

#[tokio::test]
async fn test_styleco_assistant_uses_instruction() {
    let app = app_with(Arc::new(FakeModel::new(1)));

    let body = json!({"prompt": "Where is my order?"});
    let (status, body) = post_json(app, "/styleco_assistant", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], format!("[{}] Where is my order?", STYLECO));
}

#[tokio::test]
async fn test_temperature_sweep_keeps_request_order() {
    let app = app_with(Arc::new(FakeModel::new(1)));

    let (status, body) = post_json(
        app,
        "/styleco_assistant_temperature",
        json!({"prompt": "Return policy?", "temperatures": [1.0, 0.0, 0.5]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompt"], "Return policy?");

    let responses = body["responses"].as_array().unwrap();
    let temperatures: Vec<f64> = responses
        .iter()
        .map(|r| r["temperature"].as_f64().unwrap())
        .collect();
    assert_eq!(temperatures, vec![1.0, 0.0, 0.5]);
    assert!(responses[0]["response"].as_str().unwrap().ends_with("@1"));
    assert!(responses[1]["response"].as_str().unwrap().ends_with("@0"));
}

#[tokio::test]
async fn test_temperature_sweep_defaults() {
    let app = app_with(Arc::new(FakeModel::new(1)));

    let body = json!({"prompt": "Hello"});
    let (status, body) = post_json(app, "/styleco_assistant_temperature", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responses"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_temperature_sweep_fails_as_a_whole() {
    let model = FakeModel {
        fail_on_temperature: Some(0.5),
        ..FakeModel::new(1)
    };
    let app = app_with(Arc::new(model));

    let (status, body) = post_json(
        app,
        "/styleco_assistant_temperature",
        json!({"prompt": "Hello", "temperatures": [0.0, 0.5, 1.0]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.get("responses").is_none());
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_token_analysis_small_prompt() {
    let app = app_with(Arc::new(FakeModel::new(2)));

    let (status, body) = post_json(app, "/token_analysis", json!({"prompt": "hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_count"], 2);
    assert!((body["estimated_cost_usd"].as_f64().unwrap() - 0.000001).abs() < 1e-12);
    assert_eq!(body["context_usage_percent"].as_f64().unwrap(), 0.0);
    assert_eq!(body["warnings"], json!([]));
}

#[tokio::test]
async fn test_token_analysis_near_context_limit() {
    let app = app_with(Arc::new(FakeModel::new(960_000)));

    let (status, body) = post_json(app, "/token_analysis", json!({"prompt": "long"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context_usage_percent"].as_f64().unwrap(), 96.0);
    assert_eq!(
        body["warnings"],
        json!([
            "Approaching context limit (>80%)",
            "Critical: Very close to context limit (>95%)"
        ])
    );
}

#[tokio::test]
async fn test_token_analysis_unknown_model_uses_default_tables() {
    let model = Arc::new(FakeModel::new(1_000_000));
    let app = app_with(model.clone());

    let (status, body) = post_json(
        app,
        "/token_analysis",
        json!({"prompt": "hello", "model": "gemini-unknown"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!((body["estimated_cost_usd"].as_f64().unwrap() - 0.30).abs() < 1e-9);
    assert_eq!(body["context_usage_percent"].as_f64().unwrap(), 100.0);
    assert_eq!(model.tokenized_for.lock().unwrap().as_slice(), ["gemini-unknown"]);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let app = app_with(Arc::new(FakeModel::failing()));

    let (status, body) = post_json(app.clone(), "/hello_gemini", json!({"prompt": "Hi"})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());

    let (status, _) = post_json(app, "/token_analysis", json!({"prompt": "Hi"})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = app_with(Arc::new(FakeModel::new(1)));

    let request = Request::builder()
        .method("POST")
        .uri("/hello_gemini")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());

    let (status, _) = post_json(app, "/hello_gemini", json!({"text": "no prompt field"})).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_health_and_probes() {
    let app = app_with(Arc::new(FakeModel::new(1)));

    let (status, body) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"healthy\""));

    let (status, _) = get(app.clone(), "/health/live").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"ready\""));
}

#[tokio::test]
async fn test_unhealthy_model_fails_readiness() {
    let app = app_with(Arc::new(FakeModel::failing()));

    let (status, _) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = get(app, "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("not_ready"));
}

#[tokio::test]
async fn test_degraded_service_stays_ready() {
    let app = app_with_instruction(Arc::new(FakeModel::new(1)), "   ");

    let (status, body) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"degraded\""));

    let (status, body) = get(app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"ready\""));
}

#[tokio::test]
async fn test_metrics_count_api_requests() {
    let app = app_with(Arc::new(FakeModel::new(1)));

    post_json(app.clone(), "/hello_gemini", json!({"prompt": "one"})).await;
    post_json(app.clone(), "/hello_gemini", json!({"prompt": "two"})).await;

    let (status, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("genai_api_requests_total 2"));
}

#[tokio::test]
async fn test_root_reports_service() {
    let app = app_with(Arc::new(FakeModel::new(1)));

    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("GenAI API"));
}
