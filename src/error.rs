use std::path::PathBuf;

/// Result type for scorekeeping operations
pub type ScoreResult<T> = Result<T, ScoreError>;

/// Errors that can occur while managing a game
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Failed to write {path}: {source}. The change may not have been saved")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
        }
    }
}
