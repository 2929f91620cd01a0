use uuid::Uuid;

use crate::error::FinSageError;
use crate::models::anomaly::AnomalyFinding;
use crate::models::budget::BudgetPlan;
use crate::models::profile::FinancialProfile;
use crate::models::transaction::Transaction;
use async_trait::async_trait;

/// Persistence collaborator for the engine. Implementations own any
/// per-user locking; the engine only sees read snapshots and write
/// payloads.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_transaction(&self, tx: Transaction) -> Result<(), FinSageError>;
    async fn transactions_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>, FinSageError>;

    async fn save_profile(&self, profile: FinancialProfile) -> Result<(), FinSageError>;
    async fn profile_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FinancialProfile>, FinSageError>;

    /// Save a plan, replacing any existing plan for the same
    /// (user, month). Plans supersede, they never merge.
    async fn save_plan(&self, plan: BudgetPlan) -> Result<(), FinSageError>;
    async fn plan_for_month(
        &self,
        user_id: Uuid,
        month: &str,
    ) -> Result<Option<BudgetPlan>, FinSageError>;

    /// Append findings. Findings are immutable once recorded; there is no
    /// update or delete surface.
    async fn save_findings(&self, findings: &[AnomalyFinding]) -> Result<(), FinSageError>;
    async fn findings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AnomalyFinding>, FinSageError>;
}

pub mod in_memory;
