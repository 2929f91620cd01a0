use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user-set figures the engine plans against: income, the monthly
/// spending limit, the savings target and fixed loan/EMI commitments.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub user_id: Uuid,
    pub monthly_income: f64,
    pub monthly_limit: f64,
    pub target_savings: f64,
    pub loan_commitments: f64,
    pub updated_at: DateTime<Utc>,
}
