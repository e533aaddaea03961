//! The allocation engine: validate, build the LP, solve, decorate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::policy::DiversificationPolicy;
use super::problem::build_problem;
use super::simplex::{self, SimplexFailure};
use crate::error::CollateralError;
use crate::registry::AssetRegistry;
use crate::types::{with_metadata, AssetAllocation, ComputationOutput, Money, Rate};
use crate::CollateralResult;

/// Tolerance for the post-solve constraint audit.
const AUDIT_TOLERANCE: Decimal = dec!(0.0001);

/// Full outcome of one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutput {
    pub margin_call: Money,
    /// Per-asset allocations, in registry order.
    pub allocations: Vec<AssetAllocation>,
    /// `sum allocation_i * market_value_i`.
    pub total_allocated_value: Money,
    /// `sum allocated_value_i * (1 - haircut_i)`; covers the margin call.
    pub total_post_haircut_value: Money,
    /// Objective value: value lost to haircuts across the allocation.
    pub haircut_loss: Money,
    /// Sum of allocation fractions (the breadth measure).
    pub breadth: Rate,
    /// Number of assets with a strictly positive allocation.
    pub assets_funded: usize,
}

/// Allocate the registry against a margin call under the given
/// diversification policy.
///
/// The registry is read, never mutated; each call builds a fresh problem
/// and returns an independent result, so concurrent calls over a shared
/// registry snapshot are safe.
pub fn optimize(
    registry: &AssetRegistry,
    margin_call: Money,
    policy: &DiversificationPolicy,
) -> CollateralResult<ComputationOutput<AllocationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if margin_call <= Decimal::ZERO {
        return Err(CollateralError::InvalidInput {
            field: "margin_call".into(),
            reason: format!("margin call must be positive, got {}", margin_call),
        });
    }
    registry.validate()?;
    policy.validate()?;

    let program = build_problem(registry, margin_call, policy);
    let solution = simplex::solve(&program).map_err(|failure| match failure {
        SimplexFailure::Infeasible(msg) => CollateralError::Infeasible(msg),
        SimplexFailure::Unbounded(msg) => {
            CollateralError::Infeasible(format!("unbounded formulation: {}", msg))
        }
        SimplexFailure::IterationLimit(count) => {
            CollateralError::Solver(format!("iteration limit reached after {} pivots", count))
        }
    })?;

    let allocations: Vec<AssetAllocation> = registry
        .iter()
        .zip(solution.x.iter())
        .map(|(asset, &fraction)| {
            let allocation = fraction
                .round_dp(12)
                .clamp(Decimal::ZERO, Decimal::ONE);
            let allocated_value = allocation * asset.market_value;
            AssetAllocation {
                name: asset.name.clone(),
                asset_type: asset.asset_type,
                market_value: asset.market_value,
                haircut: asset.haircut,
                eligibility: asset.eligibility,
                allocation,
                allocated_value,
                post_haircut_value: allocated_value * (Decimal::ONE - asset.haircut),
            }
        })
        .collect();

    audit(&allocations, margin_call, policy)?;

    let total_allocated_value: Money = allocations.iter().map(|a| a.allocated_value).sum();
    let total_post_haircut_value: Money = allocations.iter().map(|a| a.post_haircut_value).sum();
    let breadth: Rate = allocations.iter().map(|a| a.allocation).sum();
    let assets_funded = allocations
        .iter()
        .filter(|a| a.allocation > Decimal::ZERO)
        .count();

    let ceiling = policy.max_share * margin_call;
    let usable_capacity: Money = registry
        .iter()
        .filter(|a| a.eligibility)
        .map(|a| a.market_value.min(ceiling) * (Decimal::ONE - a.haircut))
        .sum();
    if usable_capacity < margin_call * dec!(1.05) {
        warnings.push(format!(
            "Thin headroom: usable post-haircut capacity {} against margin call {}",
            usable_capacity, margin_call
        ));
    }
    for allocation in &allocations {
        if allocation.allocated_value >= ceiling - AUDIT_TOLERANCE {
            warnings.push(format!(
                "Concentration cap binding: {} allocated {} of a {} ceiling",
                allocation.name, allocation.allocated_value, ceiling
            ));
        }
    }

    let output = AllocationOutput {
        margin_call,
        allocations,
        total_allocated_value,
        total_post_haircut_value,
        haircut_loss: solution.objective,
        breadth,
        assets_funded,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Linear-Programming Collateral Allocation (two-phase simplex)",
        &serde_json::json!({
            "n_assets": registry.len(),
            "eligible_assets": registry.eligible_count(),
            "margin_call": margin_call.to_string(),
            "max_share": policy.max_share.to_string(),
            "min_share": policy.min_share.to_string(),
            "min_breadth": policy.min_breadth.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Re-check every constraint family on the decorated result. A violation
/// here means the solver returned a corrupt point; surface it as a solver
/// failure rather than handing back a bad allocation.
fn audit(
    allocations: &[AssetAllocation],
    margin_call: Money,
    policy: &DiversificationPolicy,
) -> CollateralResult<()> {
    let tolerance = AUDIT_TOLERANCE + margin_call * dec!(0.0000001);

    let mut post_haircut = Decimal::ZERO;
    let mut breadth = Decimal::ZERO;
    let ceiling = policy.max_share * margin_call;
    let floor = policy.min_share * margin_call;

    for allocation in allocations {
        if !allocation.eligibility && !allocation.allocation.is_zero() {
            return Err(CollateralError::Solver(format!(
                "ineligible asset '{}' received allocation {}",
                allocation.name, allocation.allocation
            )));
        }
        if allocation.allocation < Decimal::ZERO || allocation.allocation > Decimal::ONE {
            return Err(CollateralError::Solver(format!(
                "allocation fraction for '{}' outside [0, 1]: {}",
                allocation.name, allocation.allocation
            )));
        }
        if allocation.eligibility {
            if allocation.allocated_value > ceiling + tolerance {
                return Err(CollateralError::Solver(format!(
                    "'{}' breaches the concentration ceiling: {} > {}",
                    allocation.name, allocation.allocated_value, ceiling
                )));
            }
            if allocation.allocated_value < floor - tolerance {
                return Err(CollateralError::Solver(format!(
                    "'{}' falls below the contribution floor: {} < {}",
                    allocation.name, allocation.allocated_value, floor
                )));
            }
            post_haircut += allocation.post_haircut_value;
            breadth += allocation.allocation;
        }
    }

    if post_haircut < margin_call - tolerance {
        return Err(CollateralError::Solver(format!(
            "coverage shortfall after decoration: {} < {}",
            post_haircut, margin_call
        )));
    }
    if breadth < policy.min_breadth - tolerance {
        return Err(CollateralError::Solver(format!(
            "breadth shortfall after decoration: {} < {}",
            breadth, policy.min_breadth
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetType, CollateralAsset};

    fn eligible(name: &str, mv: Decimal, haircut: Decimal) -> CollateralAsset {
        CollateralAsset {
            name: name.into(),
            asset_type: AssetType::Equity,
            market_value: mv,
            haircut,
            eligibility: true,
        }
    }

    fn wide_registry() -> AssetRegistry {
        AssetRegistry::new(
            (0..8)
                .map(|i| eligible(&format!("A{}", i), dec!(100000), dec!(0.1)))
                .collect(),
        )
    }

    #[test]
    fn zero_margin_call_is_invalid_input() {
        let result = optimize(
            &wide_registry(),
            Decimal::ZERO,
            &DiversificationPolicy::default(),
        );
        assert!(matches!(
            result,
            Err(CollateralError::InvalidInput { ref field, .. }) if field == "margin_call"
        ));
    }

    #[test]
    fn empty_registry_is_invalid_input() {
        let result = optimize(
            &AssetRegistry::new(vec![]),
            dec!(100000),
            &DiversificationPolicy::default(),
        );
        assert!(matches!(result, Err(CollateralError::InvalidInput { .. })));
    }

    #[test]
    fn feasible_instance_satisfies_every_constraint_family() {
        let registry = wide_registry();
        let margin_call = dec!(400000);
        let policy = DiversificationPolicy::default();
        let output = optimize(&registry, margin_call, &policy).unwrap().result;

        assert!(output.total_post_haircut_value >= margin_call - dec!(0.01));
        assert!(output.breadth >= dec!(5) - dec!(0.000001));
        let ceiling = dec!(100000);
        let floor = dec!(20000);
        for allocation in &output.allocations {
            assert!(allocation.allocation >= Decimal::ZERO);
            assert!(allocation.allocation <= Decimal::ONE);
            assert!(allocation.allocated_value <= ceiling + dec!(0.01));
            assert!(allocation.allocated_value >= floor - dec!(0.01));
        }
    }

    #[test]
    fn routine_solves_carry_no_headroom_warning() {
        let output = optimize(
            &wide_registry(),
            dec!(400000),
            &DiversificationPolicy::default(),
        )
        .unwrap();
        assert!(output.warnings.iter().all(|w| !w.contains("headroom")));
    }

    #[test]
    fn thin_capacity_registries_are_flagged() {
        // Eligible capacity is 8 * 100000 * 0.9 = 720000, under 5% above the call.
        let output = optimize(
            &wide_registry(),
            dec!(700000),
            &DiversificationPolicy::default(),
        )
        .unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("Thin headroom")));
    }

    #[test]
    fn results_do_not_mutate_the_registry() {
        let registry = wide_registry();
        let before = serde_json::to_string(&registry).unwrap();
        let _ = optimize(&registry, dec!(400000), &DiversificationPolicy::default()).unwrap();
        let after = serde_json::to_string(&registry).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn repeat_calls_share_an_objective_value() {
        let registry = wide_registry();
        let policy = DiversificationPolicy::default();
        let first = optimize(&registry, dec!(400000), &policy).unwrap().result;
        let second = optimize(&registry, dec!(400000), &policy).unwrap().result;
        assert_eq!(first.haircut_loss, second.haircut_loss);
    }
}
