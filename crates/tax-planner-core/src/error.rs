use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxPlannerError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Malformed regime configuration for '{regime}': {reason}")]
    MalformedRegime { regime: String, reason: String },

    #[error("Unknown assessment year: {0}")]
    UnknownAssessmentYear(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for TaxPlannerError {
    fn from(e: serde_json::Error) -> Self {
        TaxPlannerError::SerializationError(e.to_string())
    }
}
