//! Error taxonomy for a single analysis attempt.
//!
//! Every kind is terminal: nothing is retried automatically and no partial report
//! is ever returned. The `Display` text is the message shown to the user.

use axum::http::StatusCode;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Provider messages that mean the input blew the model's size/token budget.
const CONTENT_TOO_LARGE_SIGNATURES: &[&str] = &[
    "too many tokens",
    "exceeds the maximum number of tokens",
    "request payload size exceeds",
];

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No paper content provided. Upload a PDF or paste the paper text.")]
    NoContent,

    #[error("Failed to read the uploaded file: {0}")]
    FileRead(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No response generated from the model. Please try again.")]
    EmptyResponse,

    #[error(
        "The analysis was too long and got cut off. Please try again with a shorter paper \
         or ask for a more concise analysis in the notes."
    )]
    TruncatedOutput,

    #[error("The AI response was not valid JSON. Please try again.")]
    MalformedResponse,

    #[error("The AI response did not match the experiment plan schema ({0}). Please try again.")]
    SchemaMismatch(String),

    #[error("The paper is too large to process. Please try a smaller file or text selection.")]
    ContentTooLarge,

    #[error("The analysis timed out after {0} seconds. Please try again.")]
    Timeout(u64),

    #[error("{0}")]
    Provider(String),
}

impl AnalysisError {
    /// Stable machine-readable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::NoContent => "NO_CONTENT",
            AnalysisError::FileRead(_) => "FILE_READ_ERROR",
            AnalysisError::Configuration(_) => "CONFIGURATION_ERROR",
            AnalysisError::EmptyResponse => "EMPTY_RESPONSE",
            AnalysisError::TruncatedOutput => "TRUNCATED_OUTPUT",
            AnalysisError::MalformedResponse => "MALFORMED_RESPONSE",
            AnalysisError::SchemaMismatch(_) => "SCHEMA_MISMATCH",
            AnalysisError::ContentTooLarge => "CONTENT_TOO_LARGE",
            AnalysisError::Timeout(_) => "TIMEOUT",
            AnalysisError::Provider(_) => "PROVIDER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::NoContent | AnalysisError::FileRead(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AnalysisError::ContentTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AnalysisError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AnalysisError::EmptyResponse
            | AnalysisError::TruncatedOutput
            | AnalysisError::MalformedResponse
            | AnalysisError::SchemaMismatch(_)
            | AnalysisError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Cloneable snapshot of an `AnalysisError`, kept in session state and rendered
/// into the HTTP error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisFailure {
    pub code: &'static str,
    pub status: StatusCode,
    pub message: String,
}

impl From<&AnalysisError> for AnalysisFailure {
    fn from(err: &AnalysisError) -> Self {
        Self {
            code: err.code(),
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => {
                AnalysisError::Configuration(LlmError::MissingApiKey.to_string())
            }
            LlmError::Api { status: 413, .. } => AnalysisError::ContentTooLarge,
            LlmError::Api { message, .. } if is_content_too_large(&message) => {
                AnalysisError::ContentTooLarge
            }
            LlmError::Api { message, .. } => AnalysisError::Provider(message),
            other => {
                let message = other.to_string();
                if is_content_too_large(&message) {
                    AnalysisError::ContentTooLarge
                } else {
                    AnalysisError::Provider(message)
                }
            }
        }
    }
}

fn is_content_too_large(message: &str) -> bool {
    let lower = message.to_lowercase();
    CONTENT_TOO_LARGE_SIGNATURES
        .iter()
        .any(|signature| lower.contains(signature))
}
