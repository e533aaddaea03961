//! Translation of a registry and margin call into the allocation LP.
//!
//! The arrays are rebuilt from scratch on every call; nothing here is cached
//! or shared between solves.

use rust_decimal::Decimal;

use super::policy::DiversificationPolicy;
use super::simplex::{LinearConstraint, LinearProgram};
use crate::registry::AssetRegistry;
use crate::types::Money;

/// Build the minimization problem over one allocation-fraction variable per
/// registry asset, in registry order.
///
/// - Objective: total haircut loss `sum x_i * mv_i * h_i`.
/// - Coverage: post-haircut value of eligible assets must reach the margin
///   call (stated as its negated `<=` form).
/// - Ceiling and floor: each *eligible* asset's allocated value is banded
///   into `[min_share, max_share] * margin_call`. Ineligible assets are
///   excluded from the band; their variable is pinned instead.
/// - Breadth: the sum of allocation fractions must reach `min_breadth`.
///   This sums fractions rather than counting funded assets, so with the
///   band in force some instances are infeasible by construction (six
///   identical assets against a margin call a quarter of which caps each
///   fraction below 5/6, for example). That formulation is intentional and
///   kept as-is.
/// - Bounds: `x_i <= 1` for eligible assets, `x_i <= 0` for ineligible
///   ones, which pins them to zero regardless of how attractive their
///   haircut looks to the objective.
pub fn build_problem(
    registry: &AssetRegistry,
    margin_call: Money,
    policy: &DiversificationPolicy,
) -> LinearProgram {
    let n = registry.len();

    let objective: Vec<Decimal> = registry
        .iter()
        .map(|a| a.market_value * a.haircut)
        .collect();

    let mut constraints = Vec::with_capacity(2 * n + 2 + n);

    // Coverage: -(sum over eligible of mv*(1-h)*x) <= -margin_call.
    let coverage: Vec<Decimal> = registry
        .iter()
        .map(|a| {
            if a.eligibility {
                -(a.market_value * (Decimal::ONE - a.haircut))
            } else {
                Decimal::ZERO
            }
        })
        .collect();
    constraints.push(LinearConstraint {
        coeffs: coverage,
        rhs: -margin_call,
    });

    // Per-asset band, eligible assets only.
    let ceiling = policy.max_share * margin_call;
    let floor = policy.min_share * margin_call;
    for (i, asset) in registry.iter().enumerate() {
        if !asset.eligibility {
            continue;
        }
        constraints.push(LinearConstraint {
            coeffs: unit_row(n, i, asset.market_value),
            rhs: ceiling,
        });
        constraints.push(LinearConstraint {
            coeffs: unit_row(n, i, -asset.market_value),
            rhs: -floor,
        });
    }

    // Breadth: -(sum of eligible fractions) <= -min_breadth.
    let breadth: Vec<Decimal> = registry
        .iter()
        .map(|a| {
            if a.eligibility {
                -Decimal::ONE
            } else {
                Decimal::ZERO
            }
        })
        .collect();
    constraints.push(LinearConstraint {
        coeffs: breadth,
        rhs: -policy.min_breadth,
    });

    // Box bounds: x_i <= 1, forced to x_i <= 0 for ineligible assets.
    for (i, asset) in registry.iter().enumerate() {
        let upper = if asset.eligibility {
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
        constraints.push(LinearConstraint {
            coeffs: unit_row(n, i, Decimal::ONE),
            rhs: upper,
        });
    }

    LinearProgram {
        objective,
        constraints,
    }
}

fn unit_row(n: usize, index: usize, value: Decimal) -> Vec<Decimal> {
    let mut row = vec![Decimal::ZERO; n];
    row[index] = value;
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetType, CollateralAsset};
    use rust_decimal_macros::dec;

    fn registry() -> AssetRegistry {
        AssetRegistry::new(vec![
            CollateralAsset {
                name: "SHY".into(),
                asset_type: AssetType::GovernmentBond,
                market_value: dec!(100000),
                haircut: dec!(0.02),
                eligibility: true,
            },
            CollateralAsset {
                name: "LQD".into(),
                asset_type: AssetType::CorporateBond,
                market_value: dec!(80000),
                haircut: dec!(0.10),
                eligibility: false,
            },
        ])
    }

    #[test]
    fn objective_is_haircut_loss_per_unit_allocation() {
        let program = build_problem(&registry(), dec!(50000), &DiversificationPolicy::default());
        assert_eq!(program.objective, vec![dec!(2000), dec!(8000)]);
    }

    #[test]
    fn coverage_row_zeroes_ineligible_assets() {
        let program = build_problem(&registry(), dec!(50000), &DiversificationPolicy::default());
        let coverage = &program.constraints[0];
        assert_eq!(coverage.coeffs, vec![dec!(-98000), dec!(0)]);
        assert_eq!(coverage.rhs, dec!(-50000));
    }

    #[test]
    fn band_rows_cover_only_eligible_assets() {
        let policy = DiversificationPolicy::default();
        let program = build_problem(&registry(), dec!(50000), &policy);
        // coverage + (ceiling, floor) for the one eligible asset + breadth
        // + one bound row per asset.
        assert_eq!(program.constraints.len(), 1 + 2 + 1 + 2);

        let ceiling = &program.constraints[1];
        assert_eq!(ceiling.coeffs[0], dec!(100000));
        assert_eq!(ceiling.rhs, dec!(12500));

        let floor = &program.constraints[2];
        assert_eq!(floor.coeffs[0], dec!(-100000));
        assert_eq!(floor.rhs, dec!(-2500));
    }

    #[test]
    fn bound_rows_pin_ineligible_assets_to_zero() {
        let program = build_problem(&registry(), dec!(50000), &DiversificationPolicy::default());
        let bounds = &program.constraints[program.constraints.len() - 2..];
        assert_eq!(bounds[0].rhs, dec!(1));
        assert_eq!(bounds[1].rhs, dec!(0));
    }

    #[test]
    fn breadth_row_sums_eligible_fractions() {
        let program = build_problem(&registry(), dec!(50000), &DiversificationPolicy::default());
        let breadth = &program.constraints[3];
        assert_eq!(breadth.coeffs, vec![dec!(-1), dec!(0)]);
        assert_eq!(breadth.rhs, dec!(-5));
    }
}
