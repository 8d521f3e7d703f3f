#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Upstream returned HTTP {0}")]
    UpstreamStatus(reqwest::StatusCode),
    #[error("Failed to parse upstream JSON: {0}")]
    Json(#[from] serde_json::Error),
}
