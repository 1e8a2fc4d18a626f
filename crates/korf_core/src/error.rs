use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("no active phase for game {game_id}")]
    NoActivePhase { game_id: i64 },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl RecorderError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        RecorderError::NotFound { entity, id }
    }

    /// Whether the caller can retry the operation without changing input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RecorderError::Persistence(_))
    }
}

impl From<serde_json::Error> for RecorderError {
    fn from(err: serde_json::Error) -> Self {
        RecorderError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecorderError>;
