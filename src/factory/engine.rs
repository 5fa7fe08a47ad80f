//! Drives the LP solver for both model modes (SPEC_FULL §4.4)

use std::collections::BTreeMap;

use good_lp::{Solution, SolverModel};

use crate::error::{Error, Result};
use crate::types::LP_TOLERANCE;

use super::model::{build, BuiltModel, Mode};
use super::preprocess::Constants;

/// `microlp` exposes no primal/dual tolerance knob the way the original's
/// CBC invocation did, so the configured tolerance is applied here instead:
/// any solved value within `LP_TOLERANCE` of zero is simplex noise, not a
/// real nonzero rate, and is snapped to exactly zero before it reaches the
/// formatting layer.
fn clamp_tolerance(value: f64) -> f64 {
    if value.abs() < LP_TOLERANCE {
        0.0
    } else {
        value
    }
}

/// A solved "optimize" model: fixed target rate, minimal machine usage
pub struct SolvedOptimize {
    pub per_recipe: BTreeMap<String, f64>,
}

/// A solved "maximize_rate" model: free target rate, maximized
pub struct SolvedMaxRate {
    pub per_recipe: BTreeMap<String, f64>,
    pub max_rate: f64,
}

/// Solve with the target rate fixed. Returns `None` if that fixed-rate
/// model has no optimal solution (infeasible or unbounded), signaling the
/// caller to fall back to [`solve_max_rate`].
pub fn solve_optimize(constants: &Constants, target_rate: f64) -> Option<SolvedOptimize> {
    let built = build(constants, &Mode::Optimize { target_rate });
    let BuiltModel { variables, recipe_vars, objective, constraints, .. } = built;

    let solution = variables
        .minimise(&objective)
        .using(good_lp::default_solver)
        .with_all(constraints)
        .solve();

    match solution {
        Ok(sol) => {
            let per_recipe = recipe_vars
                .into_iter()
                .map(|(name, var)| (name, clamp_tolerance(sol.value(var))))
                .collect();
            Some(SolvedOptimize { per_recipe })
        }
        Err(_) => None,
    }
}

/// Solve with the target rate freed and maximized. Returns `Ok(None)` if
/// even this relaxed model has no feasible schedule at all (every recipe
/// at zero); any other solver failure is an internal error.
pub fn solve_max_rate(constants: &Constants) -> Result<Option<SolvedMaxRate>> {
    let built = build(constants, &Mode::MaximizeRate);
    let BuiltModel { variables, recipe_vars, target_rate_var, objective, constraints } = built;

    let solution = variables
        .maximise(&objective)
        .using(good_lp::default_solver)
        .with_all(constraints)
        .solve();

    match solution {
        Ok(sol) => {
            let per_recipe = recipe_vars
                .into_iter()
                .map(|(name, var)| (name, clamp_tolerance(sol.value(var))))
                .collect();
            let max_rate = clamp_tolerance(sol.value(target_rate_var));
            Ok(Some(SolvedMaxRate { per_recipe, max_rate }))
        }
        Err(good_lp::ResolutionError::Infeasible) | Err(good_lp::ResolutionError::Unbounded) => Ok(None),
        Err(other) => Err(Error::internal(format!("LP solve failed: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_snaps_simplex_noise_to_zero() {
        assert_eq!(clamp_tolerance(1e-11), 0.0);
        assert_eq!(clamp_tolerance(-1e-11), 0.0);
        assert_eq!(clamp_tolerance(0.5), 0.5);
    }
}
