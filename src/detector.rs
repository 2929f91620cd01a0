use crate::constants::{
    CATEGORY_RULES, CATEGORY_TIPS, LIMIT_WARNING_RATIO, OUTSIZED_TRANSACTION_FACTOR,
    SPIKE_THRESHOLD_PERCENT,
};
use crate::models::anomaly::{AnomalyFinding, AnomalyKind, Recommendation, Severity};
use crate::models::transaction::{Transaction, TransactionKind};
use crate::models::Category;
use chrono::Utc;
use log::{debug, info};
use std::collections::HashMap;
use uuid::Uuid;

/// Everything the rule set needs for one detection run. The detector is
/// stateless; all "state" is this caller-supplied view of the month.
#[derive(Clone, Debug, Default)]
pub struct SpendingSnapshot {
    pub current_by_category: HashMap<Category, f64>,
    pub allocated_by_category: HashMap<Category, f64>,
    pub last_month_by_category: HashMap<Category, f64>,
    pub monthly_limit: f64,
    pub target_savings: f64,
    /// Current-month transactions, used for the outsized-transaction rule.
    pub transactions: Vec<Transaction>,
}

impl SpendingSnapshot {
    pub fn total_expenses(&self) -> f64 {
        self.current_by_category.values().sum()
    }
}

fn finding(user_id: Uuid, kind: AnomalyKind, description: String, impact: f64) -> AnomalyFinding {
    AnomalyFinding {
        id: Uuid::new_v4(),
        user_id,
        kind,
        description,
        impact_amount: impact,
        detected_at: Utc::now(),
    }
}

/// Evaluate the five threshold rules against a spending snapshot.
///
/// Rules are evaluated independently: a category can produce an overspend
/// finding and a spike finding in the same run, and both aggregate rules
/// fire once the limit is exceeded. Categories are walked in allocation
/// table order so output order is stable.
pub fn detect_anomalies(user_id: Uuid, snapshot: &SpendingSnapshot) -> Vec<AnomalyFinding> {
    let mut findings = Vec::new();

    for rule in CATEGORY_RULES.iter() {
        let category = rule.category;
        let current = match snapshot.current_by_category.get(&category) {
            Some(&amount) => amount,
            None => continue,
        };

        // Rule 1: spend above the allocated budget.
        if let Some(&allocated) = snapshot.allocated_by_category.get(&category) {
            if allocated > 0.0 && current > allocated {
                let overspend = current - allocated;
                let percent = overspend / allocated * 100.0;
                findings.push(finding(
                    user_id,
                    AnomalyKind::CategoryOverspend {
                        category,
                        overspend,
                        percent,
                    },
                    format!(
                        "{} spending exceeded budget by {:.2} ({:.1}% over)",
                        category, overspend, percent
                    ),
                    overspend,
                ));
            }
        }

        // Rule 2: month-over-month spike, strictly above the threshold.
        if let Some(&last) = snapshot.last_month_by_category.get(&category) {
            if last > 0.0 {
                let percent = (current - last) / last * 100.0;
                if percent > SPIKE_THRESHOLD_PERCENT {
                    let increase = current - last;
                    findings.push(finding(
                        user_id,
                        AnomalyKind::MonthOverMonthSpike {
                            category,
                            increase,
                            percent,
                        },
                        format!(
                            "{} spending increased by {:.1}% compared to last month",
                            category, percent
                        ),
                        increase,
                    ));
                }
            }
        }
    }

    // Rule 3: a single transaction far above its category's average.
    let mut sums: HashMap<Category, (f64, u32)> = HashMap::new();
    for tx in snapshot
        .transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
    {
        let entry = sums.entry(tx.category).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }
    for tx in snapshot
        .transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
    {
        let (sum, count) = sums[&tx.category];
        let average = sum / count as f64;
        if tx.amount > OUTSIZED_TRANSACTION_FACTOR * average {
            findings.push(finding(
                user_id,
                AnomalyKind::OutsizedTransaction {
                    category: tx.category,
                    transaction_id: tx.id,
                    amount: tx.amount,
                    category_average: average,
                },
                format!(
                    "Unusually large {} expense of {:.2} detected ({:.1}x the category average)",
                    tx.category,
                    tx.amount,
                    tx.amount / average
                ),
                tx.amount - average,
            ));
        }
    }

    // Rules 4 and 5: aggregate risk against the monthly limit. These are
    // independent findings; exceeding the limit fires both.
    let total = snapshot.total_expenses();
    if snapshot.monthly_limit > 0.0 {
        if total > LIMIT_WARNING_RATIO * snapshot.monthly_limit {
            let used_percent = total / snapshot.monthly_limit * 100.0;
            findings.push(finding(
                user_id,
                AnomalyKind::ApproachingLimit {
                    spent: total,
                    limit: snapshot.monthly_limit,
                    used_percent,
                },
                format!("You've used {:.1}% of your monthly budget", used_percent),
                total,
            ));
        }
        if total > snapshot.monthly_limit {
            let excess = total - snapshot.monthly_limit;
            findings.push(finding(
                user_id,
                AnomalyKind::LimitExceeded {
                    spent: total,
                    limit: snapshot.monthly_limit,
                    excess,
                },
                format!("Total expenses exceeded monthly limit by {:.2}", excess),
                excess,
            ));
        }
    }

    info!(
        "Rule-based detection produced {} findings for user {}",
        findings.len(),
        user_id
    );
    findings
}

/// Turn findings into user-facing recommendations. Always returns at
/// least one entry: a canned info message covers the no-spending case and
/// a success message covers a clean month.
pub fn recommend_from_findings(
    findings: &[AnomalyFinding],
    snapshot: &SpendingSnapshot,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for item in findings {
        let message = match &item.kind {
            AnomalyKind::CategoryOverspend {
                category,
                overspend,
                ..
            } => {
                let tip = CATEGORY_TIPS.get(category).copied().unwrap_or_default();
                format!(
                    "You exceeded your {} budget by {:.2}. {}",
                    category, overspend, tip
                )
            }
            AnomalyKind::MonthOverMonthSpike {
                category, percent, ..
            } => {
                let tip = CATEGORY_TIPS.get(category).copied().unwrap_or_default();
                format!(
                    "{} spending increased {:.1}% vs last month. {}",
                    category, percent, tip
                )
            }
            AnomalyKind::OutsizedTransaction {
                category, amount, ..
            } => format!(
                "Verify whether the {:.2} {} expense was necessary. Consider spreading large expenses across months.",
                amount, category
            ),
            AnomalyKind::ApproachingLimit { spent, limit, .. } => format!(
                "Only {:.2} remaining of your monthly limit. Monitor spending carefully to avoid exceeding it.",
                limit - spent
            ),
            AnomalyKind::LimitExceeded { excess, .. } => format!(
                "Reduce discretionary spending by {:.2} to meet your savings goal of {:.2}.",
                excess, snapshot.target_savings
            ),
        };
        recommendations.push(Recommendation {
            category: item.kind.category_label(),
            message,
            severity: Severity::Warning,
        });
    }

    let total = snapshot.total_expenses();
    if total > 0.0 {
        recommendations.push(Recommendation {
            category: "Savings Opportunity".to_string(),
            message: format!(
                "Reducing expenses by 10% saves {:.2}/month. Set up an auto-transfer to savings on salary day.",
                total * 0.1
            ),
            severity: Severity::Success,
        });
    }

    if recommendations.is_empty() {
        // No transactions and nothing fired.
        recommendations.push(Recommendation {
            category: "Financial Health".to_string(),
            message: "No spending recorded yet this month. Log transactions to start tracking your budget."
                .to_string(),
            severity: Severity::Info,
        });
    } else if findings.is_empty() {
        recommendations.push(Recommendation {
            category: "Financial Health".to_string(),
            message: "Your spending looks on track. Keep monitoring category budgets to maintain this."
                .to_string(),
            severity: Severity::Success,
        });
    }

    debug!("Synthesised {} recommendations", recommendations.len());
    recommendations
}
