//! Dense two-phase primal simplex over `Decimal`.
//!
//! Solves `min c'x` subject to `A x <= b` and `x >= 0`, where `b` may carry
//! negative entries (a `>=` constraint is passed as its negated `<=` form).
//! Bland's rule is used for both the entering and leaving choice, so the
//! method terminates without cycling; the iteration cap exists as a guard
//! against pathological instances and maps to a solver failure, not
//! infeasibility.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Comparison tolerance for pivot and optimality tests.
const EPSILON: Decimal = dec!(0.000000001);

/// Hard cap on pivots across both phases.
const MAX_ITERATIONS: u32 = 10_000;

/// A single `coeffs . x <= rhs` constraint.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub coeffs: Vec<Decimal>,
    pub rhs: Decimal,
}

/// A minimization problem in inequality form.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    /// Objective coefficients, one per structural variable.
    pub objective: Vec<Decimal>,
    /// `<=` constraints over the structural variables.
    pub constraints: Vec<LinearConstraint>,
}

/// Optimal point and objective value.
#[derive(Debug, Clone)]
pub struct SimplexSolution {
    pub x: Vec<Decimal>,
    pub objective: Decimal,
}

/// Terminal failures of the solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimplexFailure {
    /// Phase one could not drive the artificial variables to zero.
    Infeasible(String),
    /// The objective decreases without bound over the feasible region.
    Unbounded(String),
    /// Pivot budget exhausted.
    IterationLimit(u32),
}

enum IterateOutcome {
    Optimal,
    Unbounded { entering: usize },
}

struct Tableau {
    /// `rows x (num_cols + 1)`; the last column is the rhs.
    rows: Vec<Vec<Decimal>>,
    /// Basic column index per row.
    basis: Vec<usize>,
    /// Total number of variable columns (structural + slack + artificial).
    num_cols: usize,
    /// First artificial column, also the column count visible to phase two.
    artificial_start: usize,
    iterations: u32,
}

/// Solve the program. `x` in the solution has one entry per structural
/// variable, in input order.
pub fn solve(lp: &LinearProgram) -> Result<SimplexSolution, SimplexFailure> {
    let n = lp.objective.len();
    let m = lp.constraints.len();

    let mut tableau = build_tableau(lp, n, m);
    let num_cols = tableau.num_cols;
    let artificial_start = tableau.artificial_start;

    // Phase one: minimize the artificial sum.
    let mut phase_one_cost = vec![Decimal::ZERO; num_cols];
    for j in artificial_start..num_cols {
        phase_one_cost[j] = Decimal::ONE;
    }

    match iterate(&mut tableau, &phase_one_cost, num_cols)? {
        IterateOutcome::Optimal => {}
        IterateOutcome::Unbounded { .. } => {
            // The artificial sum is bounded below by zero; this cannot occur
            // on a well-formed tableau.
            return Err(SimplexFailure::Unbounded(
                "phase one reported an unbounded artificial objective".into(),
            ));
        }
    }

    let residual = objective_value(&tableau, &phase_one_cost);
    if residual > EPSILON {
        return Err(SimplexFailure::Infeasible(format!(
            "no feasible point: artificial residual {} after phase one",
            residual
        )));
    }

    drive_out_artificials(&mut tableau);

    // Phase two: the real objective, artificial columns barred from entering.
    let mut phase_two_cost = vec![Decimal::ZERO; num_cols];
    phase_two_cost[..n].copy_from_slice(&lp.objective);

    match iterate(&mut tableau, &phase_two_cost, artificial_start)? {
        IterateOutcome::Optimal => {}
        IterateOutcome::Unbounded { entering } => {
            return Err(SimplexFailure::Unbounded(format!(
                "objective unbounded along variable {}",
                entering
            )));
        }
    }

    let mut x = vec![Decimal::ZERO; n];
    for (row, &basic) in tableau.basis.iter().enumerate() {
        if basic < n {
            x[basic] = tableau.rows[row][tableau.num_cols];
        }
    }

    Ok(SimplexSolution {
        objective: objective_value(&tableau, &phase_two_cost),
        x,
    })
}

fn build_tableau(lp: &LinearProgram, n: usize, m: usize) -> Tableau {
    // One slack or surplus column per row; artificial columns only for rows
    // whose rhs is negative in `<=` form (i.e. genuine `>=` constraints).
    let artificial_rows: Vec<usize> = lp
        .constraints
        .iter()
        .enumerate()
        .filter(|(_, c)| c.rhs < Decimal::ZERO)
        .map(|(i, _)| i)
        .collect();

    let artificial_start = n + m;
    let num_cols = artificial_start + artificial_rows.len();

    let mut rows = Vec::with_capacity(m);
    let mut basis = vec![0usize; m];
    let mut next_artificial = artificial_start;

    for (i, constraint) in lp.constraints.iter().enumerate() {
        let mut row = vec![Decimal::ZERO; num_cols + 1];
        let negate = constraint.rhs < Decimal::ZERO;

        for (j, &coeff) in constraint.coeffs.iter().enumerate() {
            row[j] = if negate { -coeff } else { coeff };
        }
        row[num_cols] = if negate {
            -constraint.rhs
        } else {
            constraint.rhs
        };

        // Slack for `<=` rows, surplus plus artificial for `>=` rows.
        row[n + i] = if negate { -Decimal::ONE } else { Decimal::ONE };
        if negate {
            row[next_artificial] = Decimal::ONE;
            basis[i] = next_artificial;
            next_artificial += 1;
        } else {
            basis[i] = n + i;
        }

        rows.push(row);
    }

    Tableau {
        rows,
        basis,
        num_cols,
        artificial_start,
        iterations: 0,
    }
}

/// Run simplex pivots until optimal or unbounded. Entering candidates are
/// restricted to columns below `col_limit`.
fn iterate(
    tableau: &mut Tableau,
    cost: &[Decimal],
    col_limit: usize,
) -> Result<IterateOutcome, SimplexFailure> {
    loop {
        if tableau.iterations >= MAX_ITERATIONS {
            return Err(SimplexFailure::IterationLimit(tableau.iterations));
        }

        let Some(entering) = entering_column(tableau, cost, col_limit) else {
            return Ok(IterateOutcome::Optimal);
        };

        let Some(leaving) = leaving_row(tableau, entering) else {
            return Ok(IterateOutcome::Unbounded { entering });
        };

        pivot(tableau, leaving, entering);
        tableau.iterations += 1;
    }
}

/// Bland's rule: lowest-index column with a negative reduced cost.
fn entering_column(tableau: &Tableau, cost: &[Decimal], col_limit: usize) -> Option<usize> {
    for j in 0..col_limit {
        if tableau.basis.contains(&j) {
            continue;
        }
        let mut reduced = cost[j];
        for (row, &basic) in tableau.basis.iter().enumerate() {
            let basic_cost = cost[basic];
            if !basic_cost.is_zero() {
                reduced -= basic_cost * tableau.rows[row][j];
            }
        }
        if reduced < -EPSILON {
            return Some(j);
        }
    }
    None
}

/// Minimum-ratio test; ties broken by the lowest basic index (Bland).
fn leaving_row(tableau: &Tableau, entering: usize) -> Option<usize> {
    let rhs_col = tableau.num_cols;
    let mut best: Option<(usize, Decimal)> = None;

    for (row, tab_row) in tableau.rows.iter().enumerate() {
        let coeff = tab_row[entering];
        if coeff <= EPSILON {
            continue;
        }
        let ratio = tab_row[rhs_col] / coeff;
        match best {
            None => best = Some((row, ratio)),
            Some((best_row, best_ratio)) => {
                if ratio < best_ratio - EPSILON
                    || ((ratio - best_ratio).abs() <= EPSILON
                        && tableau.basis[row] < tableau.basis[best_row])
                {
                    best = Some((row, ratio));
                }
            }
        }
    }

    best.map(|(row, _)| row)
}

fn pivot(tableau: &mut Tableau, leaving: usize, entering: usize) {
    let width = tableau.num_cols + 1;
    let pivot_value = tableau.rows[leaving][entering];

    for j in 0..width {
        tableau.rows[leaving][j] /= pivot_value;
    }

    for row in 0..tableau.rows.len() {
        if row == leaving {
            continue;
        }
        let factor = tableau.rows[row][entering];
        if factor.is_zero() {
            continue;
        }
        for j in 0..width {
            let delta = factor * tableau.rows[leaving][j];
            tableau.rows[row][j] -= delta;
        }
    }

    tableau.basis[leaving] = entering;
}

/// After a successful phase one, pivot any artificial still in the basis
/// onto a structural or slack column. Rows where no such pivot exists are
/// redundant constraints: all their visible coefficients are zero, so they
/// stay inert through phase two.
fn drive_out_artificials(tableau: &mut Tableau) {
    for row in 0..tableau.rows.len() {
        if tableau.basis[row] < tableau.artificial_start {
            continue;
        }
        let target = (0..tableau.artificial_start)
            .find(|&j| !tableau.basis.contains(&j) && tableau.rows[row][j].abs() > EPSILON);
        if let Some(j) = target {
            pivot(tableau, row, j);
        }
    }
}

fn objective_value(tableau: &Tableau, cost: &[Decimal]) -> Decimal {
    let rhs_col = tableau.num_cols;
    tableau
        .basis
        .iter()
        .enumerate()
        .map(|(row, &basic)| cost[basic] * tableau.rows[row][rhs_col])
        .sum()
}
