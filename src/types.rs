//! Common types shared by the belts and factory solvers

use serde::{Deserialize, Serialize};

/// Absolute tolerance used for flow-conservation and feasibility checks
pub const FLOW_TOLERANCE: f64 = 1e-9;

/// Primal/dual tolerance the LP engine is configured with (see SPEC_FULL §4.4)
pub const LP_TOLERANCE: f64 = 1e-10;

/// Status of a solver run, independent of which engine produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStatus {
    /// Optimal solution found
    Optimal,
    /// Problem is infeasible
    Infeasible,
    /// Problem is unbounded
    Unbounded,
}

impl SolverStatus {
    /// Returns true if a solution was found
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal)
    }
}

/// Diagnostics from a solver run, logged but not part of the response document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    /// Time spent solving (seconds)
    pub solve_time_seconds: f64,
    /// Number of iterations the engine performed
    pub iterations: usize,
}
