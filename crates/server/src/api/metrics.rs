use axum::extract::State;

use crate::utils::AppState;

/// Prometheus text-exposition scrape endpoint. Requires no API key.
pub async fn metrics(State(state): State<AppState>) -> String {
  state.metrics.render()
}
