use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum FinSageError {
    /// Monetary input was negative where only zero or positive is allowed
    #[error("Negative amount for `{0}`: {1}")]
    NegativeAmount(String, f64),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// No financial profile has been recorded for the user
    #[error("Financial profile for user {0} not found")]
    ProfileNotFound(String),

    /// No budget plan exists for the requested month
    #[error("Budget plan for month {0} not found")]
    PlanNotFound(String),

    /// Month key is not in YYYY-MM form
    #[error("Invalid month key: {0}")]
    InvalidMonth(String),

    /// Insight service call failed (timeout, transport, non-2xx)
    #[error("Insight service error: {0}")]
    InsightServiceError(String),

    /// Insight service answered but the payload could not be used
    #[error("Malformed insight response: {0}")]
    MalformedInsightResponse(String),

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Catch-all for unexpected errors
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}
