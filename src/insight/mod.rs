//! External natural-language insight service.
//!
//! The engine treats the service as an opaque, possibly-failing
//! collaborator: one attempt per insights run, and any failure (timeout,
//! transport error, non-2xx, unusable payload) sends the caller down the
//! deterministic rule fallback. Backends: a chat-completions HTTP client
//! and a mock for tests and offline runs.

pub mod groq;
pub mod mock;
pub mod parsing;

pub use groq::GroqInsightBackend;
pub use mock::MockInsightBackend;

use crate::error::FinSageError;
use crate::models::anomaly::Recommendation;
use crate::models::Category;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

/// The month snapshot handed to the insight service.
#[derive(Clone, Debug, Default, Serialize)]
pub struct InsightRequest {
    pub monthly_income: f64,
    pub monthly_limit: f64,
    pub target_savings: f64,
    pub total_expenses: f64,
    pub current_by_category: HashMap<Category, f64>,
    pub allocated_by_category: HashMap<Category, f64>,
    pub last_month_by_category: HashMap<Category, f64>,
}

/// One call, result or error; retries and recovery are the caller's
/// problem, not the backend's.
#[async_trait]
pub trait InsightService: Send + Sync {
    /// Produce per-category recommendations for the given month snapshot.
    async fn recommend(&self, request: &InsightRequest)
    -> Result<Vec<Recommendation>, FinSageError>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
