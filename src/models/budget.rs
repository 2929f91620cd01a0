use super::category::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority class governing allocation order and percentage bounds.
/// Lower tiers are funded first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    Essential = 1,
    Important = 2,
    Discretionary = 3,
}

/// One category's share of a monthly budget plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category: Category,
    pub allocated_amount: f64,
    pub tier: PriorityTier,
}

/// A generated budget for one (user, month). A later run for the same
/// month supersedes this plan entirely; plans are never merged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub allocations: Vec<CategoryAllocation>,
    pub created_at: DateTime<Utc>,
}

impl BudgetPlan {
    /// Allocated amount for a category, if the plan funds it.
    pub fn allocated(&self, category: Category) -> Option<f64> {
        self.allocations
            .iter()
            .find(|a| a.category == category)
            .map(|a| a.allocated_amount)
    }
}
