use crate::error::FinSageError;
use crate::models::anomaly::AnomalyFinding;
use crate::models::budget::BudgetPlan;
use crate::models::profile::FinancialProfile;
use crate::models::transaction::Transaction;
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct InMemoryStorage {
    transactions: Mutex<HashMap<Uuid, Vec<Transaction>>>, // user_id -> transactions
    profiles: Mutex<HashMap<Uuid, FinancialProfile>>,
    plans: Mutex<HashMap<(Uuid, String), BudgetPlan>>, // (user_id, month) -> plan
    findings: Mutex<HashMap<Uuid, Vec<AnomalyFinding>>>, // user_id -> findings
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            transactions: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
            plans: Mutex::new(HashMap::new()),
            findings: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_transaction(&self, tx: Transaction) -> Result<(), FinSageError> {
        let mut transactions = self.transactions.lock().await;
        transactions.entry(tx.user_id).or_default().push(tx);
        Ok(())
    }

    async fn transactions_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>, FinSageError> {
        // For production: use a database query with an index on (user_id, date)
        Ok(self
            .transactions
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_profile(&self, profile: FinancialProfile) -> Result<(), FinSageError> {
        self.profiles.lock().await.insert(profile.user_id, profile);
        Ok(())
    }

    async fn profile_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FinancialProfile>, FinSageError> {
        Ok(self.profiles.lock().await.get(&user_id).cloned())
    }

    async fn save_plan(&self, plan: BudgetPlan) -> Result<(), FinSageError> {
        // Insert replaces: a re-run for the same month supersedes the old plan.
        self.plans
            .lock()
            .await
            .insert((plan.user_id, plan.month.clone()), plan);
        Ok(())
    }

    async fn plan_for_month(
        &self,
        user_id: Uuid,
        month: &str,
    ) -> Result<Option<BudgetPlan>, FinSageError> {
        Ok(self
            .plans
            .lock()
            .await
            .get(&(user_id, month.to_string()))
            .cloned())
    }

    async fn save_findings(&self, findings: &[AnomalyFinding]) -> Result<(), FinSageError> {
        // For production: batch writes
        let mut stored = self.findings.lock().await;
        for item in findings {
            stored.entry(item.user_id).or_default().push(item.clone());
        }
        Ok(())
    }

    async fn findings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AnomalyFinding>, FinSageError> {
        Ok(self
            .findings
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}
