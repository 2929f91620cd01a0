//! Mock insight backend for tests and offline runs.

use async_trait::async_trait;

use crate::error::FinSageError;
use crate::models::anomaly::{Recommendation, Severity};

use super::{InsightRequest, InsightService};

/// Deterministic stand-in for the external service: either answers with
/// canned recommendations or fails every call.
#[derive(Clone, Debug)]
pub struct MockInsightBackend {
    fail: bool,
    canned: Vec<Recommendation>,
}

impl MockInsightBackend {
    /// A backend that answers every call with one canned recommendation.
    pub fn healthy() -> Self {
        Self {
            fail: false,
            canned: vec![Recommendation {
                category: "Mock Advice".to_string(),
                message: "Spending is within expectations.".to_string(),
                severity: Severity::Info,
            }],
        }
    }

    /// A backend that fails every call, for exercising the fallback path.
    pub fn failing() -> Self {
        Self {
            fail: true,
            canned: Vec::new(),
        }
    }

    pub fn with_recommendations(recommendations: Vec<Recommendation>) -> Self {
        Self {
            fail: false,
            canned: recommendations,
        }
    }
}

#[async_trait]
impl InsightService for MockInsightBackend {
    async fn recommend(
        &self,
        _request: &InsightRequest,
    ) -> Result<Vec<Recommendation>, FinSageError> {
        if self.fail {
            return Err(FinSageError::InsightServiceError(
                "Mock backend configured to fail".into(),
            ));
        }
        Ok(self.canned.clone())
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }

    fn model(&self) -> &str {
        "mock"
    }
}
