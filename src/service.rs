use crate::allocator::allocate_budget;
use crate::detector::{SpendingSnapshot, detect_anomalies, recommend_from_findings};
use crate::error::{FieldError, FinSageError};
use crate::insight::{InsightRequest, InsightService};
use crate::models::anomaly::{AnomalyFinding, InsightsSummary, Recommendation};
use crate::models::budget::BudgetPlan;
use crate::models::profile::FinancialProfile;
use crate::models::transaction::{DashboardStats, Transaction, TransactionKind};
use crate::models::Category;
use crate::storage::Storage;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_INSIGHT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct FinSageService<S: Storage, I: InsightService> {
    storage: S,
    insight: I,
    insight_timeout: Duration,
}

impl<S: Storage, I: InsightService> FinSageService<S, I> {
    pub fn new(storage: S, insight: I) -> Self {
        info!("Initializing FinSageService");
        FinSageService {
            storage,
            insight,
            insight_timeout: DEFAULT_INSIGHT_TIMEOUT,
        }
    }

    pub fn with_insight_timeout(mut self, timeout: Duration) -> Self {
        self.insight_timeout = timeout;
        self
    }

    fn validate_amount(&self, field: &str, value: f64) -> Result<(), FinSageError> {
        if value < 0.0 {
            return Err(FinSageError::NegativeAmount(field.to_string(), value));
        }
        if !value.is_finite() {
            return Err(FinSageError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} must be a finite number", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_month(&self, month: &str) -> Result<(), FinSageError> {
        NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
            .map_err(|_| FinSageError::InvalidMonth(month.to_string()))?;
        Ok(())
    }

    // TRANSACTIONS

    pub async fn record_transaction(
        &self,
        user_id: Uuid,
        amount: f64,
        category: Category,
        description: Option<String>,
        kind: TransactionKind,
        date: Option<DateTime<Utc>>,
    ) -> Result<Transaction, FinSageError> {
        self.validate_amount("amount", amount)?;

        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id,
            amount,
            category,
            description,
            kind,
            date: date.unwrap_or_else(Utc::now),
        };
        self.storage.save_transaction(tx.clone()).await?;
        debug!("Recorded {:?} transaction {} for user {}", kind, tx.id, user_id);
        Ok(tx)
    }

    /// All of a user's transactions, newest first.
    pub async fn transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, FinSageError> {
        let mut transactions = self.storage.transactions_for_user(user_id).await?;
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    // PROFILE

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        monthly_income: f64,
        monthly_limit: f64,
        target_savings: f64,
        loan_commitments: f64,
    ) -> Result<FinancialProfile, FinSageError> {
        self.validate_amount("monthly_income", monthly_income)?;
        self.validate_amount("monthly_limit", monthly_limit)?;
        self.validate_amount("target_savings", target_savings)?;
        self.validate_amount("loan_commitments", loan_commitments)?;

        let profile = FinancialProfile {
            user_id,
            monthly_income,
            monthly_limit,
            target_savings,
            loan_commitments,
            updated_at: Utc::now(),
        };
        self.storage.save_profile(profile.clone()).await?;
        info!("Updated financial profile for user {}", user_id);
        Ok(profile)
    }

    async fn require_profile(&self, user_id: Uuid) -> Result<FinancialProfile, FinSageError> {
        self.storage
            .profile_for_user(user_id)
            .await?
            .ok_or_else(|| FinSageError::ProfileNotFound(user_id.to_string()))
    }

    // BUDGET

    /// Generate and persist the budget plan for one month, superseding any
    /// previous plan for that month. An empty plan (spendable <= 0) is a
    /// valid result, not an error.
    pub async fn generate_budget(
        &self,
        user_id: Uuid,
        month: &str,
    ) -> Result<BudgetPlan, FinSageError> {
        self.validate_month(month)?;
        let profile = self.require_profile(user_id).await?;

        let transactions = self.storage.transactions_for_user(user_id).await?;
        let prior_month = previous_month(month)?;
        let past_expenses = expenses_by_category(&transactions, &prior_month);

        let allocations = allocate_budget(
            profile.monthly_income,
            profile.target_savings,
            profile.loan_commitments,
            &past_expenses,
        )?;

        let plan = BudgetPlan {
            id: Uuid::new_v4(),
            user_id,
            month: month.to_string(),
            allocations,
            created_at: Utc::now(),
        };
        self.storage.save_plan(plan.clone()).await?;
        info!(
            "Saved budget plan for user {} month {} ({} categories)",
            user_id,
            month,
            plan.allocations.len()
        );
        Ok(plan)
    }

    pub async fn budget_plan(
        &self,
        user_id: Uuid,
        month: &str,
    ) -> Result<BudgetPlan, FinSageError> {
        self.validate_month(month)?;
        self.storage
            .plan_for_month(user_id, month)
            .await?
            .ok_or_else(|| FinSageError::PlanNotFound(month.to_string()))
    }

    // INSIGHTS

    /// Run the detection rules for one month, record the findings, and
    /// produce recommendations: one attempt against the insight service
    /// (bounded by the configured timeout), then the local fallback. The
    /// returned summary always carries at least one recommendation.
    pub async fn monthly_insights(
        &self,
        user_id: Uuid,
        month: &str,
    ) -> Result<InsightsSummary, FinSageError> {
        self.validate_month(month)?;
        let profile = self.require_profile(user_id).await?;

        let transactions = self.storage.transactions_for_user(user_id).await?;
        let prior_month = previous_month(month)?;

        let current_by_category = expenses_by_category(&transactions, month);
        let last_month_by_category = expenses_by_category(&transactions, &prior_month);
        let allocated_by_category = match self.storage.plan_for_month(user_id, month).await? {
            Some(plan) => plan
                .allocations
                .iter()
                .map(|a| (a.category, a.allocated_amount))
                .collect(),
            None => HashMap::new(),
        };

        let snapshot = SpendingSnapshot {
            current_by_category,
            allocated_by_category,
            last_month_by_category,
            monthly_limit: profile.monthly_limit,
            target_savings: profile.target_savings,
            transactions: transactions
                .iter()
                .filter(|tx| {
                    tx.kind == TransactionKind::Expense && month_key(&tx.date) == month
                })
                .cloned()
                .collect(),
        };

        let findings = detect_anomalies(user_id, &snapshot);
        self.storage.save_findings(&findings).await?;

        let recommendations = self.recommendations_for(&snapshot, &findings, &profile).await;
        Ok(InsightsSummary {
            findings,
            recommendations,
        })
    }

    async fn recommendations_for(
        &self,
        snapshot: &SpendingSnapshot,
        findings: &[AnomalyFinding],
        profile: &FinancialProfile,
    ) -> Vec<Recommendation> {
        let request = InsightRequest {
            monthly_income: profile.monthly_income,
            monthly_limit: profile.monthly_limit,
            target_savings: profile.target_savings,
            total_expenses: snapshot.total_expenses(),
            current_by_category: snapshot.current_by_category.clone(),
            allocated_by_category: snapshot.allocated_by_category.clone(),
            last_month_by_category: snapshot.last_month_by_category.clone(),
        };

        match tokio::time::timeout(self.insight_timeout, self.insight.recommend(&request)).await {
            Ok(Ok(recommendations)) if !recommendations.is_empty() => {
                info!(
                    "Insight service ({}) returned {} recommendations",
                    self.insight.model(),
                    recommendations.len()
                );
                recommendations
            }
            Ok(Ok(_)) => {
                warn!("Insight service returned no recommendations, using rule-based fallback");
                recommend_from_findings(findings, snapshot)
            }
            Ok(Err(e)) => {
                warn!("Insight service failed: {}. Using rule-based fallback", e);
                recommend_from_findings(findings, snapshot)
            }
            Err(_) => {
                warn!(
                    "Insight service timed out after {:?}. Using rule-based fallback",
                    self.insight_timeout
                );
                recommend_from_findings(findings, snapshot)
            }
        }
    }

    // DASHBOARD

    pub async fn dashboard_stats(&self, user_id: Uuid) -> Result<DashboardStats, FinSageError> {
        let transactions = self.transactions(user_id).await?;
        let findings = self.storage.findings_for_user(user_id).await?;

        let total_income: f64 = transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Income)
            .map(|tx| tx.amount)
            .sum();
        let total_expenses: f64 = transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Expense)
            .map(|tx| tx.amount)
            .sum();

        let now = Utc::now();
        let this_month = month_key(&now);
        let last_month = previous_month(&this_month)?;
        let this_month_expenses: f64 = expenses_by_category(&transactions, &this_month)
            .values()
            .sum();
        let last_month_expenses: f64 = expenses_by_category(&transactions, &last_month)
            .values()
            .sum();

        Ok(DashboardStats {
            total_income,
            total_expenses,
            savings: total_income - total_expenses,
            anomaly_count: findings.len(),
            this_month_expenses,
            last_month_expenses,
            recent_transactions: transactions.into_iter().take(5).collect(),
        })
    }
}

/// `YYYY-MM` key for a timestamp.
pub fn month_key(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m").to_string()
}

/// The month before a `YYYY-MM` key.
pub fn previous_month(month: &str) -> Result<String, FinSageError> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| FinSageError::InvalidMonth(month.to_string()))?;
    let (year, month_number) = if first.month() == 1 {
        (first.year() - 1, 12)
    } else {
        (first.year(), first.month() - 1)
    };
    Ok(format!("{:04}-{:02}", year, month_number))
}

/// Per-category expense totals for one month.
pub fn expenses_by_category(
    transactions: &[Transaction],
    month: &str,
) -> HashMap<Category, f64> {
    let mut totals = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense && month_key(&tx.date) == month)
    {
        *totals.entry(tx.category).or_insert(0.0) += tx.amount;
    }
    totals
}
