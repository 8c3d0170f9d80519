use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid question set: {0}")]
    InvalidQuestionSet(String),
    #[error("Invalid form record: {0}")]
    InvalidRecord(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
