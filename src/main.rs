use chrono::{Datelike, Duration, Utc};
use finsage::config::Config;
use finsage::insight::{GroqInsightBackend, InsightService};
use finsage::models::{Category, TransactionKind};
use finsage::service::FinSageService;
use finsage::storage::in_memory::InMemoryStorage;
use finsage::{FinSageError, MockInsightBackend};
use tracing::{info, warn};
use uuid::Uuid;

/// Demo run: seed a user with two months of spending, generate the
/// month's budget, then pull insights. Uses the hosted insight backend
/// when INSIGHT_API_KEY is set, otherwise the offline mock.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .init();
    info!("Starting FinSage demo with config {:?}", config);

    match GroqInsightBackend::from_config(&config) {
        Some(backend) => {
            if backend.health_check().await {
                info!("Insight backend {} is reachable", backend.model());
            } else {
                warn!(
                    "Insight backend {} is unreachable, recommendations will fall back to the local rules",
                    backend.model()
                );
            }
            run_demo(config, backend).await?;
        }
        None => {
            info!("No INSIGHT_API_KEY set, running with the mock insight backend");
            run_demo(config, MockInsightBackend::failing()).await?;
        }
    }
    Ok(())
}

async fn run_demo<I: InsightService>(
    config: Config,
    backend: I,
) -> Result<(), FinSageError> {
    let storage = InMemoryStorage::new();
    let service = FinSageService::new(storage, backend)
        .with_insight_timeout(std::time::Duration::from_secs(config.insight_timeout_secs));

    let user_id = Uuid::new_v4();
    service
        .update_profile(user_id, 50000.0, 30000.0, 10000.0, 0.0)
        .await?;

    let now = Utc::now();
    let last_month = now.with_day(1).expect("day 1 is always valid") - Duration::days(1);
    let seed = [
        (12000.0, Category::Rent, last_month),
        (5200.0, Category::Food, last_month),
        (1800.0, Category::Transport, last_month),
        (12000.0, Category::Rent, now),
        (7800.0, Category::Food, now),
        (2600.0, Category::Transport, now),
        (4100.0, Category::Shopping, now),
    ];
    for (amount, category, date) in seed {
        service
            .record_transaction(
                user_id,
                amount,
                category,
                None,
                TransactionKind::Expense,
                Some(date),
            )
            .await?;
    }

    let month = finsage::service::month_key(&now);
    let plan = service.generate_budget(user_id, &month).await?;
    println!(
        "Budget plan for {}:\n{}",
        month,
        serde_json::to_string_pretty(&plan.allocations)
            .map_err(|e| FinSageError::InternalServerError(e.to_string()))?
    );

    let summary = service.monthly_insights(user_id, &month).await?;
    println!(
        "Insights:\n{}",
        serde_json::to_string_pretty(&summary)
            .map_err(|e| FinSageError::InternalServerError(e.to_string()))?
    );

    let stats = service.dashboard_stats(user_id).await?;
    println!(
        "Dashboard:\n{}",
        serde_json::to_string_pretty(&stats)
            .map_err(|e| FinSageError::InternalServerError(e.to_string()))?
    );
    Ok(())
}
