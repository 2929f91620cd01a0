use super::category::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A single money movement. Amounts are stored as absolute values; the
/// direction is carried by `kind`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub description: Option<String>,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
}

/// Headline numbers for the dashboard view.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub savings: f64,
    pub anomaly_count: usize,
    pub this_month_expenses: f64,
    pub last_month_expenses: f64,
    pub recent_transactions: Vec<Transaction>,
}
