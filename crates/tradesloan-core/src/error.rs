use thiserror::Error;

#[derive(Debug, Error)]
pub enum TradesLoanError {
    #[error("Invalid policy: {field} — {reason}")]
    InvalidPolicy { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for TradesLoanError {
    fn from(e: serde_json::Error) -> Self {
        TradesLoanError::SerializationError(e.to_string())
    }
}
