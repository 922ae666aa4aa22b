//! Error types for the HVAC assistant.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HvacError {
    #[error("Follow-up question is required")]
    EmptyQuestion,

    #[error("Text generation backend error: {0}")]
    Collaborator(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HvacError {
    /// HTTP status code used when this error is surfaced by the API layer
    pub fn status_code(&self) -> u16 {
        match self {
            HvacError::EmptyQuestion => 400,
            HvacError::Collaborator(_) => 502,
            HvacError::Config(_) => 500,
            HvacError::Io(_) => 500,
            HvacError::Json(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_question_is_client_error() {
        assert_eq!(HvacError::EmptyQuestion.status_code(), 400);
    }

    #[test]
    fn test_collaborator_is_bad_gateway() {
        let err = HvacError::Collaborator("timeout".to_string());
        assert_eq!(err.status_code(), 502);
    }
}
