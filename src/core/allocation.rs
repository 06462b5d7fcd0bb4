use super::types::{AllocationEntry, AllocationResult, AssetClass, InvestorProfile};

const COUNT: usize = AssetClass::COUNT;

const STOCKS: usize = AssetClass::Stocks.index();
const BONDS: usize = AssetClass::Bonds.index();
const CASH: usize = AssetClass::Cash.index();
const ALTERNATIVES: usize = AssetClass::Alternatives.index();

const TARGET_TOTAL: i32 = 100;

type Weights = [f64; COUNT];
type Percentages = [i32; COUNT];

/// Computes the recommended split across the six asset classes.
///
/// Total over every input: the profile is never rejected, and the result
/// always holds all six classes in `AssetClass::ALL` order summing to 100.
pub fn compute_allocation(profile: &InvestorProfile) -> AllocationResult {
    let percentages = reconcile_to_target(normalize(&floored_weights(profile)));
    let result = build_result(percentages);
    tracing::debug!(
        age = profile.age,
        risk_tolerance = profile.risk_tolerance,
        time_horizon = profile.time_horizon,
        ?percentages,
        "computed allocation"
    );
    result
}

/// Adjusted and floor-clamped weights, before normalization.
pub(crate) fn floored_weights(profile: &InvestorProfile) -> Weights {
    let weights = baseline_weights();
    let weights = apply_age_adjustment(weights, profile.age);
    let weights = apply_risk_adjustment(weights, profile.risk_tolerance);
    let weights = apply_horizon_adjustment(weights, profile.time_horizon);
    apply_floors(weights)
}

fn baseline_weights() -> Weights {
    AssetClass::ALL.map(AssetClass::baseline_weight)
}

fn apply_age_adjustment(mut weights: Weights, age: i32) -> Weights {
    let age_adj = (60 - i64::from(age)).clamp(-15, 15) as f64;
    weights[STOCKS] += age_adj * 0.5;
    weights[BONDS] -= age_adj * 0.3;
    weights[CASH] -= age_adj * 0.1;
    weights
}

fn apply_risk_adjustment(mut weights: Weights, risk_tolerance: i32) -> Weights {
    let risk_adj = ((i64::from(risk_tolerance) - 3) * 5) as f64;
    weights[STOCKS] += risk_adj;
    weights[ALTERNATIVES] += risk_adj * 0.2;
    weights[BONDS] -= risk_adj * 0.8;
    weights[CASH] -= risk_adj * 0.2;
    weights
}

fn apply_horizon_adjustment(mut weights: Weights, time_horizon: i32) -> Weights {
    let horizon_adj = (i64::from(time_horizon) - 10) as f64 * 0.5;
    weights[STOCKS] += horizon_adj;
    weights[BONDS] -= horizon_adj * 0.6;
    weights[CASH] -= horizon_adj * 0.4;
    weights
}

fn apply_floors(weights: Weights) -> Weights {
    let mut floored = weights;
    for asset_class in AssetClass::ALL {
        let idx = asset_class.index();
        floored[idx] = floored[idx].max(asset_class.floor_weight());
    }
    floored
}

/// Scales weights to percentages and rounds each one half away from zero.
/// Every floor is positive so the divisor can never be zero.
fn normalize(weights: &Weights) -> Percentages {
    let total: f64 = weights.iter().sum();
    assert!(
        total > 0.0,
        "floored allocation weights must have a positive total, got {total}"
    );
    weights.map(|weight| (weight / total * 100.0).round() as i32)
}

/// Walks the classes cyclically from Stocks, moving one point per step toward
/// the target until the rounded percentages sum to exactly 100.
pub(crate) fn reconcile_to_target(percentages: Percentages) -> Percentages {
    let mut reconciled = percentages;
    let mut total: i32 = reconciled.iter().sum();
    let mut idx = 0;
    while total != TARGET_TOTAL {
        if total < TARGET_TOTAL {
            reconciled[idx] += 1;
            total += 1;
        } else {
            reconciled[idx] -= 1;
            total -= 1;
        }
        idx = (idx + 1) % COUNT;
    }
    reconciled
}

fn build_result(percentages: Percentages) -> AllocationResult {
    AllocationResult {
        entries: AssetClass::ALL.map(|asset_class| AllocationEntry {
            asset_class,
            percentage: percentages[asset_class.index()],
            display_color: asset_class.display_color(),
        }),
    }
}
