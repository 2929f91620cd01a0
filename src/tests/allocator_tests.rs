use crate::allocator::allocate_budget;
use crate::error::FinSageError;
use crate::models::budget::PriorityTier;
use crate::models::Category;
use std::collections::HashMap;

fn total(allocations: &[crate::models::budget::CategoryAllocation]) -> f64 {
    allocations.iter().map(|a| a.allocated_amount).sum()
}

fn amount_for(
    allocations: &[crate::models::budget::CategoryAllocation],
    category: Category,
) -> f64 {
    allocations
        .iter()
        .find(|a| a.category == category)
        .map(|a| a.allocated_amount)
        .unwrap()
}

#[test]
fn test_allocation_without_history_uses_minimum_bands() {
    // spendable = 40000
    let plan = allocate_budget(50000.0, 10000.0, 0.0, &HashMap::new()).unwrap();

    assert_eq!(plan.len(), 9);
    let rent = amount_for(&plan, Category::Rent);
    let food = amount_for(&plan, Category::Food);
    assert!((10000.0..=14000.0).contains(&rent), "rent = {}", rent);
    assert!((6000.0..=10000.0).contains(&food), "food = {}", food);
    assert!(total(&plan) <= 40000.0 + 0.09);

    // No history: tiers 1 and 2 sit at their minimum percentages.
    assert_eq!(rent, 10000.0);
    assert_eq!(food, 6000.0);
    assert_eq!(amount_for(&plan, Category::Bills), 4000.0);
    assert_eq!(amount_for(&plan, Category::Healthcare), 2000.0);
    assert_eq!(amount_for(&plan, Category::Transport), 3200.0);
    assert_eq!(amount_for(&plan, Category::Education), 2000.0);
}

#[test]
fn test_discretionary_split_respects_per_category_caps() {
    // spendable = 40000, tiers 1-2 take 27200, remaining 12800, even
    // share 4266.67 per discretionary category, each capped at its max%.
    let plan = allocate_budget(50000.0, 10000.0, 0.0, &HashMap::new()).unwrap();

    assert_eq!(amount_for(&plan, Category::Shopping), 4000.0); // 10% cap
    assert_eq!(amount_for(&plan, Category::Entertainment), 3200.0); // 8% cap
    assert_eq!(amount_for(&plan, Category::Other), 2000.0); // 5% cap
}

#[test]
fn test_negative_spendable_yields_empty_plan() {
    // spendable = -1000
    let plan = allocate_budget(10000.0, 9000.0, 2000.0, &HashMap::new()).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_zero_spendable_yields_empty_plan() {
    let plan = allocate_budget(1000.0, 1000.0, 0.0, &HashMap::new()).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_history_is_clamped_into_band() {
    // spendable = 10000. Rent history of 5000 is 50%, clamped to the 35%
    // ceiling; Food history of 100 is 1%, lifted to the 15% floor.
    let history = HashMap::from([(Category::Rent, 5000.0), (Category::Food, 100.0)]);
    let plan = allocate_budget(10000.0, 0.0, 0.0, &history).unwrap();

    assert_eq!(amount_for(&plan, Category::Rent), 3500.0);
    assert_eq!(amount_for(&plan, Category::Food), 1500.0);
}

#[test]
fn test_heavy_history_triggers_proportional_shrink() {
    // Every tier-1/2 category at its ceiling sums to 112% of spendable,
    // forcing the scaling pass.
    let history = HashMap::from([
        (Category::Rent, 9000.0),
        (Category::Food, 9000.0),
        (Category::Bills, 9000.0),
        (Category::Healthcare, 9000.0),
        (Category::Transport, 9000.0),
        (Category::Education, 9000.0),
    ]);
    let plan = allocate_budget(10000.0, 0.0, 0.0, &history).unwrap();

    let sum = total(&plan);
    assert!(sum <= 10000.0 + 0.09, "total = {}", sum);
    // Relative proportions survive the shrink: Rent stays the largest.
    assert!(amount_for(&plan, Category::Rent) > amount_for(&plan, Category::Bills));
    // Nothing was left for discretionary categories.
    assert_eq!(amount_for(&plan, Category::Shopping), 0.0);
}

#[test]
fn test_allocation_is_deterministic() {
    let history = HashMap::from([(Category::Rent, 12000.0), (Category::Food, 7000.0)]);
    let first = allocate_budget(50000.0, 10000.0, 5000.0, &history).unwrap();
    let second = allocate_budget(50000.0, 10000.0, 5000.0, &history).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_is_ordered_by_tier() {
    let plan = allocate_budget(50000.0, 10000.0, 0.0, &HashMap::new()).unwrap();
    let tiers: Vec<PriorityTier> = plan.iter().map(|a| a.tier).collect();
    let mut sorted = tiers.clone();
    sorted.sort();
    assert_eq!(tiers, sorted);
    assert_eq!(plan[0].category, Category::Rent);
}

#[test]
fn test_negative_inputs_are_rejected() {
    let empty = HashMap::new();
    assert!(matches!(
        allocate_budget(-1.0, 0.0, 0.0, &empty),
        Err(FinSageError::NegativeAmount(_, _))
    ));
    assert!(matches!(
        allocate_budget(1000.0, -5.0, 0.0, &empty),
        Err(FinSageError::NegativeAmount(_, _))
    ));
    assert!(matches!(
        allocate_budget(1000.0, 0.0, -5.0, &empty),
        Err(FinSageError::NegativeAmount(_, _))
    ));

    let bad_history = HashMap::from([(Category::Food, -20.0)]);
    assert!(matches!(
        allocate_budget(1000.0, 0.0, 0.0, &bad_history),
        Err(FinSageError::NegativeAmount(_, _))
    ));
}

#[test]
fn test_non_finite_inputs_are_rejected() {
    let empty = HashMap::new();
    assert!(matches!(
        allocate_budget(f64::NAN, 0.0, 0.0, &empty),
        Err(FinSageError::InvalidInput(_, _))
    ));
    assert!(matches!(
        allocate_budget(f64::INFINITY, 0.0, 0.0, &empty),
        Err(FinSageError::InvalidInput(_, _))
    ));
    assert!(matches!(
        allocate_budget(50000.0, f64::NAN, 0.0, &empty),
        Err(FinSageError::InvalidInput(_, _))
    ));

    let bad_history = HashMap::from([(Category::Food, f64::INFINITY)]);
    assert!(matches!(
        allocate_budget(50000.0, 0.0, 0.0, &bad_history),
        Err(FinSageError::InvalidInput(_, _))
    ));
}

#[test]
fn test_amounts_are_rounded_to_cents() {
    let history = HashMap::from([(Category::Rent, 3333.33)]);
    let plan = allocate_budget(10000.0, 1.0, 0.5, &history).unwrap();
    for allocation in &plan {
        let cents = allocation.allocated_amount * 100.0;
        assert!(
            (cents - cents.round()).abs() < 1e-6,
            "{} not rounded: {}",
            allocation.category,
            allocation.allocated_amount
        );
    }
}
