use thiserror::Error;

pub type Result<T> = std::result::Result<T, VisualSqlError>;

/// Failures surfaced by configuration validation and snapshot
/// (de)serialization. Compilation itself is total and never errors;
/// parse failure is an absent result, not an error.
#[derive(Debug, Error)]
pub enum VisualSqlError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
