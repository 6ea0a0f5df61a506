//! Metrics collection and reporting

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// System metrics
#[derive(Debug, Clone)]
pub struct SystemMetrics {
    /// Total API requests processed
    pub total_requests: u64,

    /// API requests that ended in a server error
    pub total_errors: u64,

    /// Requests currently being handled
    pub active_requests: usize,

    /// Average response time (ms)
    pub avg_response_time_ms: f64,

    /// Calls made to the model service
    pub upstream_calls: u64,

    /// Failed calls to the model service
    pub upstream_errors: u64,

    /// Sum of all token counts reported by the tokenizer
    pub tokens_counted: u64,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Latency histogram buckets (in milliseconds)
const LATENCY_BUCKETS: &[f64] = &[
    5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
];

/// Histogram for tracking latency distribution
#[derive(Debug, Clone)]
pub struct Histogram {
    buckets: Vec<(f64, Arc<AtomicU64>)>,
    sum: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
}

impl Histogram {
    fn new(buckets: &[f64]) -> Self {
        let bucket_counters = buckets
            .iter()
            .map(|&b| (b, Arc::new(AtomicU64::new(0))))
            .collect();

        Self {
            buckets: bucket_counters,
            sum: Arc::new(AtomicU64::new(0)),
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    fn observe(&self, value_ms: f64) {
        self.sum.fetch_add(value_ms as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        // Cumulative: every bucket at or above the value counts it
        for (bucket, counter) in &self.buckets {
            if value_ms <= *bucket {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn export_prometheus(&self, name: &str, help: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("# HELP {} {}\n", name, help));
        output.push_str(&format!("# TYPE {} histogram\n", name));

        for (bucket, counter) in &self.buckets {
            let count = counter.load(Ordering::Relaxed);
            output.push_str(&format!("{}_bucket{{le=\"{}\"}} {}\n", name, bucket, count));
        }

        let total_count = self.count.load(Ordering::Relaxed);
        output.push_str(&format!("{}_bucket{{le=\"+Inf\"}} {}\n", name, total_count));

        let sum = self.sum.load(Ordering::Relaxed) as f64;
        output.push_str(&format!("{}_sum {:.3}\n", name, sum));
        output.push_str(&format!("{}_count {}\n", name, total_count));

        output
    }
}

/// Metrics collector
pub struct MetricsCollector {
    start_time: Instant,
    total_requests: Arc<AtomicU64>,
    total_errors: Arc<AtomicU64>,
    active_requests: Arc<AtomicUsize>,
    total_response_time_ms: Arc<AtomicU64>,
    upstream_calls: Arc<AtomicU64>,
    upstream_errors: Arc<AtomicU64>,
    tokens_counted: Arc<AtomicU64>,

    request_latency: Histogram,
    upstream_latency: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_requests: Arc::new(AtomicU64::new(0)),
            total_errors: Arc::new(AtomicU64::new(0)),
            active_requests: Arc::new(AtomicUsize::new(0)),
            total_response_time_ms: Arc::new(AtomicU64::new(0)),
            upstream_calls: Arc::new(AtomicU64::new(0)),
            upstream_errors: Arc::new(AtomicU64::new(0)),
            tokens_counted: Arc::new(AtomicU64::new(0)),
            request_latency: Histogram::new(LATENCY_BUCKETS),
            upstream_latency: Histogram::new(LATENCY_BUCKETS),
        }
    }

    /// Record a completed API request
    pub fn record_request(&self, response_time: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let ms = response_time.as_millis() as u64;
        self.total_response_time_ms.fetch_add(ms, Ordering::Relaxed);
        self.request_latency.observe(ms as f64);
    }

    /// Record an API request that failed with a server error
    pub fn record_error(&self) {
        self.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one call to the model service
    pub fn record_upstream_call(&self, duration: Duration, success: bool) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.upstream_errors.fetch_add(1, Ordering::Relaxed);
        }
        self.upstream_latency.observe(duration.as_millis() as f64);
    }

    /// Add a tokenizer result to the running total
    pub fn record_tokens_counted(&self, tokens: u64) {
        self.tokens_counted.fetch_add(tokens, Ordering::Relaxed);
    }

    pub fn increment_active(&self) {
        self.active_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active(&self) {
        self.active_requests.fetch_sub(1, Ordering::Relaxed);
    }

    /// Get current metrics
    pub fn get_metrics(&self) -> SystemMetrics {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let total_response_time = self.total_response_time_ms.load(Ordering::Relaxed);

        let avg_response_time_ms = if total_requests > 0 {
            total_response_time as f64 / total_requests as f64
        } else {
            0.0
        };

        SystemMetrics {
            total_requests,
            total_errors: self.total_errors.load(Ordering::Relaxed),
            active_requests: self.active_requests.load(Ordering::Relaxed),
            avg_response_time_ms,
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            tokens_counted: self.tokens_counted.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let metrics = self.get_metrics();

        let mut output = format!(
            "# HELP genai_api_requests_total Total number of API requests\n\
             # TYPE genai_api_requests_total counter\n\
             genai_api_requests_total {}\n\
             \n\
             # HELP genai_api_errors_total Total number of API requests failing with a server error\n\
             # TYPE genai_api_errors_total counter\n\
             genai_api_errors_total {}\n\
             \n\
             # HELP genai_api_active_requests Requests currently in flight\n\
             # TYPE genai_api_active_requests gauge\n\
             genai_api_active_requests {}\n\
             \n\
             # HELP genai_api_avg_response_time_ms Average response time in milliseconds\n\
             # TYPE genai_api_avg_response_time_ms gauge\n\
             genai_api_avg_response_time_ms {:.2}\n\
             \n\
             # HELP genai_api_upstream_calls_total Calls made to the model service\n\
             # TYPE genai_api_upstream_calls_total counter\n\
             genai_api_upstream_calls_total {}\n\
             \n\
             # HELP genai_api_upstream_errors_total Failed calls to the model service\n\
             # TYPE genai_api_upstream_errors_total counter\n\
             genai_api_upstream_errors_total {}\n\
             \n\
             # HELP genai_api_tokens_counted_total Tokens reported by the tokenizer\n\
             # TYPE genai_api_tokens_counted_total counter\n\
             genai_api_tokens_counted_total {}\n\
             \n\
             # HELP genai_api_uptime_seconds Uptime in seconds\n\
             # TYPE genai_api_uptime_seconds counter\n\
             genai_api_uptime_seconds {}\n\
             \n",
            metrics.total_requests,
            metrics.total_errors,
            metrics.active_requests,
            metrics.avg_response_time_ms,
            metrics.upstream_calls,
            metrics.upstream_errors,
            metrics.tokens_counted,
            metrics.uptime_secs,
        );

        output.push_str(&self.request_latency.export_prometheus(
            "genai_api_request_duration_ms",
            "Request duration in milliseconds"
        ));
        output.push('\n');

        output.push_str(&self.upstream_latency.export_prometheus(
            "genai_api_upstream_duration_ms",
            "Model service call duration in milliseconds"
        ));

        output
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
