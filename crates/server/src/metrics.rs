use prometheus::{Encoder, HistogramVec, IntCounterVec, Registry, TextEncoder, register_histogram_vec_with_registry, register_int_counter_vec_with_registry};

/// Process-wide Prometheus registry (§9 "Observability"). One instance
/// lives in `AppState`; `render` backs the `/metrics` scrape endpoint.
pub struct Metrics {
  registry: Registry,
  pub http_requests_total: IntCounterVec,
  pub http_request_duration_seconds: HistogramVec,
  pub recall_requests_total: IntCounterVec,
  pub extraction_jobs_total: IntCounterVec,
}

impl Metrics {
  #[must_use]
  pub fn new() -> Self {
    let registry = Registry::new();

    let http_requests_total = register_int_counter_vec_with_registry!(
      "mnemo_http_requests_total",
      "Total HTTP requests handled, by route and status class",
      &["route", "status"],
      registry
    )
    .expect("metric registration is infallible for a fresh registry");

    let http_request_duration_seconds = register_histogram_vec_with_registry!(
      "mnemo_http_request_duration_seconds",
      "HTTP request latency in seconds, by route",
      &["route"],
      registry
    )
    .expect("metric registration is infallible for a fresh registry");

    let recall_requests_total = register_int_counter_vec_with_registry!(
      "mnemo_recall_requests_total",
      "Recall requests, partitioned by which stage produced the result",
      &["stage"],
      registry
    )
    .expect("metric registration is infallible for a fresh registry");

    let extraction_jobs_total = register_int_counter_vec_with_registry!(
      "mnemo_extraction_jobs_total",
      "Fact extraction job outcomes",
      &["outcome"],
      registry
    )
    .expect("metric registration is infallible for a fresh registry");

    Self {
      registry,
      http_requests_total,
      http_request_duration_seconds,
      recall_requests_total,
      extraction_jobs_total,
    }
  }

  /// Render the current metric snapshot in Prometheus text exposition format.
  #[must_use]
  pub fn render(&self) -> String {
    let metric_families = self.registry.gather();
    let mut buffer = Vec::new();
    TextEncoder::new()
      .encode(&metric_families, &mut buffer)
      .expect("text encoding never fails for well-formed metric families");
    String::from_utf8(buffer).expect("prometheus text encoder always emits valid UTF-8")
  }
}

impl Default for Metrics {
  fn default() -> Self {
    Self::new()
  }
}
