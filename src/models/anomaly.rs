use super::category::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The specific rule a finding came from, with the numbers that fired it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Current-month category spend exceeded the allocated budget.
    CategoryOverspend {
        category: Category,
        overspend: f64,
        percent: f64,
    },
    /// Category spend rose more than the spike threshold vs last month.
    MonthOverMonthSpike {
        category: Category,
        increase: f64,
        percent: f64,
    },
    /// One transaction dwarfed the category's average transaction.
    OutsizedTransaction {
        category: Category,
        transaction_id: Uuid,
        amount: f64,
        category_average: f64,
    },
    /// Total spend is within striking distance of the monthly limit.
    ApproachingLimit {
        spent: f64,
        limit: f64,
        used_percent: f64,
    },
    /// Total spend went over the monthly limit.
    LimitExceeded { spent: f64, limit: f64, excess: f64 },
}

impl AnomalyKind {
    /// Label used where a finding is reported against a category heading.
    pub fn category_label(&self) -> String {
        match self {
            AnomalyKind::CategoryOverspend { category, .. } => category.to_string(),
            AnomalyKind::MonthOverMonthSpike { category, .. } => category.to_string(),
            AnomalyKind::OutsizedTransaction { category, .. } => category.to_string(),
            AnomalyKind::ApproachingLimit { .. } | AnomalyKind::LimitExceeded { .. } => {
                "Overall Budget".to_string()
            }
        }
    }
}

/// One detected rule violation. Immutable once recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: AnomalyKind,
    pub description: String,
    pub impact_amount: f64,
    pub detected_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Success,
    Info,
}

/// User-facing advice derived from findings. Generated fresh on every
/// insights request, never persisted on its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub message: String,
    pub severity: Severity,
}

/// The full result of one insights run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsightsSummary {
    pub findings: Vec<AnomalyFinding>,
    pub recommendations: Vec<Recommendation>,
}
