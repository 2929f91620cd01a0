use crate::error::FinSageError;
use crate::insight::mock::MockInsightBackend;
use crate::insight::{InsightRequest, InsightService};
use crate::models::anomaly::{AnomalyKind, Recommendation, Severity};
use crate::models::transaction::TransactionKind;
use crate::models::Category;
use crate::service::{FinSageService, previous_month};
use crate::storage::in_memory::InMemoryStorage;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::time::Duration;
use uuid::Uuid;

fn service_with(
    backend: MockInsightBackend,
) -> FinSageService<InMemoryStorage, MockInsightBackend> {
    let _ = env_logger::builder().is_test(true).try_init();
    FinSageService::new(InMemoryStorage::new(), backend)
}

fn on(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

async fn seed_profile(
    service: &FinSageService<InMemoryStorage, impl InsightService>,
    user_id: Uuid,
) {
    service
        .update_profile(user_id, 50000.0, 30000.0, 10000.0, 0.0)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_generate_budget_supersedes_previous_plan() {
    let service = service_with(MockInsightBackend::failing());
    let user_id = Uuid::new_v4();
    seed_profile(&service, user_id).await;

    let first = service.generate_budget(user_id, "2025-08").await.unwrap();

    // Prior-month spending appears and steers the next run.
    service
        .record_transaction(
            user_id,
            13000.0,
            Category::Rent,
            None,
            TransactionKind::Expense,
            Some(on(2025, 7, 10)),
        )
        .await
        .unwrap();
    let second = service.generate_budget(user_id, "2025-08").await.unwrap();

    assert_ne!(first.id, second.id);
    let stored = service.budget_plan(user_id, "2025-08").await.unwrap();
    assert_eq!(stored.id, second.id);
    // 13000 of 40000 spendable is 32.5%, inside the Rent band.
    assert_eq!(stored.allocated(Category::Rent), Some(13000.0));
}

#[tokio::test]
async fn test_generate_budget_with_no_spendable_returns_empty_plan() {
    let service = service_with(MockInsightBackend::failing());
    let user_id = Uuid::new_v4();
    service
        .update_profile(user_id, 10000.0, 10000.0, 9000.0, 2000.0)
        .await
        .unwrap();

    let plan = service.generate_budget(user_id, "2025-08").await.unwrap();
    assert!(plan.allocations.is_empty());

    // The empty plan is still persisted for the month.
    let stored = service.budget_plan(user_id, "2025-08").await.unwrap();
    assert_eq!(stored.id, plan.id);
}

#[tokio::test]
async fn test_generate_budget_requires_profile() {
    let service = service_with(MockInsightBackend::failing());
    let result = service.generate_budget(Uuid::new_v4(), "2025-08").await;
    assert!(matches!(result, Err(FinSageError::ProfileNotFound(_))));
}

#[tokio::test]
async fn test_invalid_month_key_is_rejected() {
    let service = service_with(MockInsightBackend::failing());
    let result = service.generate_budget(Uuid::new_v4(), "August 2025").await;
    assert!(matches!(result, Err(FinSageError::InvalidMonth(_))));
}

#[tokio::test]
async fn test_record_transaction_rejects_negative_amount() {
    let service = service_with(MockInsightBackend::failing());
    let result = service
        .record_transaction(
            Uuid::new_v4(),
            -50.0,
            Category::Food,
            None,
            TransactionKind::Expense,
            None,
        )
        .await;
    assert!(matches!(result, Err(FinSageError::NegativeAmount(_, _))));
}

#[tokio::test]
async fn test_insights_fall_back_when_insight_service_fails() {
    let service = service_with(MockInsightBackend::failing());
    let user_id = Uuid::new_v4();
    seed_profile(&service, user_id).await;

    service.generate_budget(user_id, "2025-08").await.unwrap();
    // Overspend Food: allocation without history is 6000.
    service
        .record_transaction(
            user_id,
            8000.0,
            Category::Food,
            None,
            TransactionKind::Expense,
            Some(on(2025, 8, 5)),
        )
        .await
        .unwrap();

    let summary = service.monthly_insights(user_id, "2025-08").await.unwrap();

    assert!(
        summary
            .findings
            .iter()
            .any(|f| matches!(f.kind, AnomalyKind::CategoryOverspend { .. }))
    );
    assert!(!summary.recommendations.is_empty());
    assert!(
        summary
            .recommendations
            .iter()
            .any(|r| r.severity == Severity::Warning)
    );

    // Findings were recorded and show up in the dashboard count.
    let stats = service.dashboard_stats(user_id).await.unwrap();
    assert_eq!(stats.anomaly_count, summary.findings.len());
}

#[tokio::test]
async fn test_insights_use_backend_recommendations_when_available() {
    let canned = vec![Recommendation {
        category: "Food".to_string(),
        message: "Cook at home this week.".to_string(),
        severity: Severity::Warning,
    }];
    let service = service_with(MockInsightBackend::with_recommendations(canned.clone()));
    let user_id = Uuid::new_v4();
    seed_profile(&service, user_id).await;

    let summary = service.monthly_insights(user_id, "2025-08").await.unwrap();
    assert_eq!(summary.recommendations, canned);
}

#[tokio::test]
async fn test_empty_backend_response_triggers_fallback() {
    let service = service_with(MockInsightBackend::with_recommendations(Vec::new()));
    let user_id = Uuid::new_v4();
    seed_profile(&service, user_id).await;

    let summary = service.monthly_insights(user_id, "2025-08").await.unwrap();
    // No transactions at all: the canned info recommendation covers it.
    assert_eq!(summary.recommendations.len(), 1);
    assert_eq!(summary.recommendations[0].severity, Severity::Info);
}

/// Backend that hangs longer than any sane timeout.
struct HangingInsightBackend;

#[async_trait]
impl InsightService for HangingInsightBackend {
    async fn recommend(
        &self,
        _request: &InsightRequest,
    ) -> Result<Vec<Recommendation>, FinSageError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn model(&self) -> &str {
        "hanging"
    }
}

#[tokio::test]
async fn test_insight_timeout_triggers_fallback() {
    let service = FinSageService::new(InMemoryStorage::new(), HangingInsightBackend)
        .with_insight_timeout(Duration::from_millis(50));
    let user_id = Uuid::new_v4();
    service
        .update_profile(user_id, 50000.0, 30000.0, 10000.0, 0.0)
        .await
        .unwrap();

    let summary = service.monthly_insights(user_id, "2025-08").await.unwrap();
    assert!(!summary.recommendations.is_empty());
}

#[tokio::test]
async fn test_dashboard_stats_aggregates_by_month() {
    let service = service_with(MockInsightBackend::failing());
    let user_id = Uuid::new_v4();
    seed_profile(&service, user_id).await;

    let now = Utc::now();
    // Last day of the previous month, whatever today is.
    let last_month = now.with_day(1).unwrap() - chrono::Duration::days(1);
    service
        .record_transaction(
            user_id,
            50000.0,
            Category::Other,
            Some("Salary".to_string()),
            TransactionKind::Income,
            Some(now),
        )
        .await
        .unwrap();
    service
        .record_transaction(
            user_id,
            1200.0,
            Category::Food,
            None,
            TransactionKind::Expense,
            Some(now),
        )
        .await
        .unwrap();
    service
        .record_transaction(
            user_id,
            900.0,
            Category::Food,
            None,
            TransactionKind::Expense,
            Some(last_month),
        )
        .await
        .unwrap();

    let stats = service.dashboard_stats(user_id).await.unwrap();
    assert_eq!(stats.total_income, 50000.0);
    assert_eq!(stats.total_expenses, 2100.0);
    assert_eq!(stats.savings, 47900.0);
    assert_eq!(stats.this_month_expenses, 1200.0);
    assert_eq!(stats.last_month_expenses, 900.0);
    assert_eq!(stats.recent_transactions.len(), 3);
    // Newest first.
    assert!(stats.recent_transactions[0].date >= stats.recent_transactions[1].date);
}

#[tokio::test]
async fn test_mock_backend_health_reflects_its_mode() {
    assert!(MockInsightBackend::healthy().health_check().await);
    assert!(!MockInsightBackend::failing().health_check().await);
}

#[test]
fn test_previous_month_rolls_over_the_year() {
    assert_eq!(previous_month("2025-08").unwrap(), "2025-07");
    assert_eq!(previous_month("2025-01").unwrap(), "2024-12");
    assert!(previous_month("not-a-month").is_err());
}
