use crate::constants::CATEGORY_RULES;
use crate::error::{FieldError, FinSageError};
use crate::models::budget::{CategoryAllocation, PriorityTier};
use crate::models::Category;
use log::{debug, info, warn};
use std::collections::HashMap;

/// Upper bound on proportional-shrink passes. Convergence takes at most
/// two in practice; the bound only guards against a pathological stall.
const MAX_SCALE_PASSES: u32 = 8;

fn require_valid_amount(field: &str, value: f64) -> Result<(), FinSageError> {
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

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Partition the spendable amount (income minus savings target minus loan
/// commitments) across the fixed category table.
///
/// Tier-1 and tier-2 categories are funded from their own percentage
/// bands, steered by `past_expenses` where present; tier-3 categories
/// split whatever is left. The returned amounts never sum to more than
/// the spendable amount.
///
/// A non-positive spendable amount yields an empty plan; that is a valid
/// terminal state, not an error. Negative inputs are rejected.
pub fn allocate_budget(
    income: f64,
    target_savings: f64,
    loan_commitments: f64,
    past_expenses: &HashMap<Category, f64>,
) -> Result<Vec<CategoryAllocation>, FinSageError> {
    require_valid_amount("income", income)?;
    require_valid_amount("target_savings", target_savings)?;
    require_valid_amount("loan_commitments", loan_commitments)?;
    for (category, amount) in past_expenses {
        require_valid_amount(&format!("past_expenses[{}]", category), *amount)?;
    }

    let spendable = income - target_savings - loan_commitments;
    if spendable <= 0.0 {
        warn!(
            "Spendable amount is {:.2} (income {:.2}, savings {:.2}, loans {:.2}); returning empty plan",
            spendable, income, target_savings, loan_commitments
        );
        return Ok(Vec::new());
    }

    let mut allocations: Vec<CategoryAllocation> = Vec::with_capacity(CATEGORY_RULES.len());
    let mut total_allocated = 0.0;

    // Tiers 1 and 2 are funded from their own bands before the remaining
    // budget is known: essentials never wait on discretionary spend.
    for rule in CATEGORY_RULES
        .iter()
        .filter(|r| r.tier != PriorityTier::Discretionary)
    {
        let pct = match past_expenses.get(&rule.category) {
            Some(&past) => (past / spendable).clamp(rule.min_pct, rule.max_pct),
            None => rule.min_pct,
        };
        let amount = pct * spendable;
        total_allocated += amount;
        allocations.push(CategoryAllocation {
            category: rule.category,
            allocated_amount: amount,
            tier: rule.tier,
        });
    }

    // Tier 3 splits the remainder evenly, each share capped at the
    // category's own maximum fraction of spendable.
    let discretionary: Vec<_> = CATEGORY_RULES
        .iter()
        .filter(|r| r.tier == PriorityTier::Discretionary)
        .collect();
    let remaining = (spendable - total_allocated).max(0.0);
    let even_share = remaining / discretionary.len() as f64;
    for rule in discretionary {
        let amount = even_share.min(rule.max_pct * spendable);
        total_allocated += amount;
        allocations.push(CategoryAllocation {
            category: rule.category,
            allocated_amount: amount,
            tier: rule.tier,
        });
    }

    // Proportional shrink until the plan fits inside spendable. One pass
    // can leave floating-point residue, hence the loop.
    let mut passes = 0;
    while total_allocated > spendable && passes < MAX_SCALE_PASSES {
        let factor = spendable / total_allocated;
        debug!(
            "Plan total {:.4} exceeds spendable {:.4}, scaling by {:.6}",
            total_allocated, spendable, factor
        );
        for allocation in &mut allocations {
            allocation.allocated_amount *= factor;
        }
        total_allocated = allocations.iter().map(|a| a.allocated_amount).sum();
        passes += 1;
    }
    if total_allocated > spendable {
        warn!(
            "Plan total {:.6} still above spendable {:.6} after {} passes",
            total_allocated, spendable, passes
        );
    }

    for allocation in &mut allocations {
        allocation.allocated_amount = round2(allocation.allocated_amount);
    }

    info!(
        "Allocated {} categories, total {:.2} of spendable {:.2}",
        allocations.len(),
        allocations.iter().map(|a| a.allocated_amount).sum::<f64>(),
        spendable
    );
    Ok(allocations)
}
