use recruit_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Question data not loaded")]
    QuestionsNotLoaded,
    #[error("Question index {index} out of range (0..{len})")]
    InvalidQuestionIndex { index: usize, len: usize },
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
