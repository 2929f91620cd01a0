pub mod anomaly;
pub mod budget;
pub mod category;
pub mod profile;
pub mod transaction;

pub use anomaly::{AnomalyFinding, AnomalyKind, InsightsSummary, Recommendation, Severity};
pub use budget::{BudgetPlan, CategoryAllocation, PriorityTier};
pub use category::Category;
pub use profile::FinancialProfile;
pub use transaction::{DashboardStats, Transaction, TransactionKind};
