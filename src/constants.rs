use crate::models::budget::PriorityTier;
use crate::models::Category;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Allocation band for one spending category, expressed as fractions of
/// the spendable amount.
pub struct CategoryRule {
    pub category: Category,
    pub tier: PriorityTier,
    pub min_pct: f64,
    pub max_pct: f64,
}

/// Fixed allocation table, ordered by tier then priority within the tier.
/// The allocator walks this table front to back.
pub const CATEGORY_RULES: [CategoryRule; 9] = [
    CategoryRule {
        category: Category::Rent,
        tier: PriorityTier::Essential,
        min_pct: 0.25,
        max_pct: 0.35,
    },
    CategoryRule {
        category: Category::Food,
        tier: PriorityTier::Essential,
        min_pct: 0.15,
        max_pct: 0.25,
    },
    CategoryRule {
        category: Category::Bills,
        tier: PriorityTier::Essential,
        min_pct: 0.10,
        max_pct: 0.15,
    },
    CategoryRule {
        category: Category::Healthcare,
        tier: PriorityTier::Essential,
        min_pct: 0.05,
        max_pct: 0.10,
    },
    CategoryRule {
        category: Category::Transport,
        tier: PriorityTier::Important,
        min_pct: 0.08,
        max_pct: 0.12,
    },
    CategoryRule {
        category: Category::Education,
        tier: PriorityTier::Important,
        min_pct: 0.05,
        max_pct: 0.15,
    },
    CategoryRule {
        category: Category::Shopping,
        tier: PriorityTier::Discretionary,
        min_pct: 0.05,
        max_pct: 0.10,
    },
    CategoryRule {
        category: Category::Entertainment,
        tier: PriorityTier::Discretionary,
        min_pct: 0.03,
        max_pct: 0.08,
    },
    CategoryRule {
        category: Category::Other,
        tier: PriorityTier::Discretionary,
        min_pct: 0.02,
        max_pct: 0.05,
    },
];

/// Month-over-month increase (percent) above which a category spike fires.
/// Strictly greater-than: an increase of exactly 30% does not fire.
pub const SPIKE_THRESHOLD_PERCENT: f64 = 30.0;

/// A single transaction larger than this multiple of its category's
/// average transaction amount is flagged as outsized.
pub const OUTSIZED_TRANSACTION_FACTOR: f64 = 2.0;

/// Fraction of the monthly limit at which the aggregate "approaching
/// limit" warning fires.
pub const LIMIT_WARNING_RATIO: f64 = 0.9;

/// Practical per-category tips used when recommendations are synthesised
/// locally instead of by the insight service.
pub static CATEGORY_TIPS: Lazy<HashMap<Category, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            Category::Rent,
            "Consider splitting rent with a flatmate or negotiating with your landlord.",
        ),
        (
            Category::Food,
            "Meal prep on Sundays to avoid ordering food. Cook at home 5 days a week.",
        ),
        (
            Category::Bills,
            "Switch off appliances at the plug. Use fans instead of AC for a few hours daily.",
        ),
        (
            Category::Healthcare,
            "Use generic medicines and public clinics for routine checkups.",
        ),
        (
            Category::Transport,
            "Use public transport or carpool 3 days a week. Combine errands into single trips.",
        ),
        (
            Category::Education,
            "Use free resources like open courseware or library books.",
        ),
        (
            Category::Shopping,
            "Use a 48-hour rule before buying anything non-essential. Uninstall shopping apps temporarily.",
        ),
        (
            Category::Entertainment,
            "Switch to free streaming tiers. Plan low-cost outings like parks or game nights.",
        ),
        (
            Category::Other,
            "Review miscellaneous expenses and categorise them to identify where to cut.",
        ),
    ])
});
