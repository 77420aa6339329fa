use serde_json::{json, Value};
use thiserror::Error;

/// Fixed client-facing message for completions that are not valid JSON.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse AI response";

/// Main error type for the planning service
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller input violates a validation bound. The message is returned verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Failed to parse AI response")]
    Parse {
        /// Leading excerpt of the offending completion text
        raw_response: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("AI response does not match itinerary schema: {0}")]
    Schema(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlanningError>;

impl PlanningError {
    /// Check if the caller can fix this error by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PlanningError::Validation(_) | PlanningError::InvalidBody(_)
        )
    }

    /// Get the error code for structured logs
    pub fn error_code(&self) -> &'static str {
        match self {
            PlanningError::Config(_) => "CONFIG_ERROR",
            PlanningError::Validation(_) => "VALIDATION_ERROR",
            PlanningError::InvalidBody(_) => "INVALID_BODY",
            PlanningError::Provider(_) => "PROVIDER_ERROR",
            PlanningError::Parse { .. } => "PARSE_ERROR",
            PlanningError::Schema(_) => "SCHEMA_ERROR",
        }
    }

    /// Convert to the JSON body returned to HTTP clients
    pub fn to_error_payload(&self) -> Value {
        match self {
            PlanningError::Provider(message) => json!({ "error": message }),
            PlanningError::Parse { raw_response, .. } => json!({
                "error": PARSE_FAILURE_MESSAGE,
                "raw_response": raw_response,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}
