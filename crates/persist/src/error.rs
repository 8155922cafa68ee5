/// Errors from parsing or building state documents.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from file-backed state persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
}
