use thiserror::Error;

/// Raised when a snapshot cannot be read, written or parsed. The target
/// structure is never partially mutated.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
