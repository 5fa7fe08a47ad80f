//! Steady-state recipe scheduling: minimize machine usage to hit a target
//! output rate, or certify why no schedule can reach it (SPEC_FULL §4.4-§4.6)

pub mod engine;
pub mod model;
pub mod preprocess;
pub mod translate;
pub mod types;

use tracing::info;

use crate::error::Result;
use crate::rational::{number_to_rational, to_f64};

pub use types::{FactoryRequest, FactoryResponse};

/// Solve a factory request end to end: preprocess constants, attempt the
/// fixed-rate model, and fall back to the free-rate model to diagnose
/// infeasibility when the fixed-rate model has no optimal solution.
pub fn solve(request: &FactoryRequest) -> Result<FactoryResponse> {
    let constants = preprocess::Constants::build(request)?;
    let target_rate = to_f64(&number_to_rational(&request.target.rate_per_min)?);

    if let Some(solved) = engine::solve_optimize(&constants, target_rate) {
        info!(target = %constants.target_item, rate = target_rate, "factory solve: optimal");
        return Ok(translate::success(&constants, &solved.per_recipe));
    }

    match engine::solve_max_rate(&constants)? {
        None => {
            info!("factory solve: infeasible even at zero target rate");
            Ok(translate::infeasible_at_zero())
        }
        Some(solved) => {
            info!(max_rate = solved.max_rate, "factory solve: reporting max feasible rate");
            Ok(translate::infeasible_at_rate(&constants, &solved.per_recipe, solved.max_rate))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::types::{LimitsSpec, MachineSpec, ModuleSpec, RecipeSpec, TargetSpec};
    use serde_json::Number;
    use std::collections::BTreeMap;

    fn num(s: &str) -> Number {
        s.parse().unwrap()
    }

    #[test]
    fn two_step_chain_hits_target_rate() {
        let mut machines = BTreeMap::new();
        machines.insert("smelter".to_string(), MachineSpec { crafts_per_min: num("60") });
        machines.insert("press".to_string(), MachineSpec { crafts_per_min: num("60") });

        let mut recipes = BTreeMap::new();
        let mut plate_out = BTreeMap::new();
        plate_out.insert("iron_plate".to_string(), num("1"));
        recipes.insert(
            "smelt_plate".to_string(),
            RecipeSpec {
                machine: "smelter".to_string(),
                time_s: num("1"),
                inputs: BTreeMap::new(),
                out: plate_out,
            },
        );

        let mut rod_in = BTreeMap::new();
        rod_in.insert("iron_plate".to_string(), num("1"));
        let mut rod_out = BTreeMap::new();
        rod_out.insert("iron_rod".to_string(), num("1"));
        recipes.insert(
            "press_rod".to_string(),
            RecipeSpec { machine: "press".to_string(), time_s: num("1"), inputs: rod_in, out: rod_out },
        );

        let request = FactoryRequest {
            machines,
            recipes,
            modules: BTreeMap::new(),
            limits: LimitsSpec::default(),
            target: TargetSpec { item: "iron_rod".to_string(), rate_per_min: num("30") },
        };

        let response = solve(&request).unwrap();
        match response {
            FactoryResponse::Ok { per_recipe_crafts_per_min, .. } => {
                assert!((per_recipe_crafts_per_min["smelt_plate"] - 30.0).abs() < 1e-6);
                assert!((per_recipe_crafts_per_min["press_rod"] - 30.0).abs() < 1e-6);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn infeasible_due_to_raw_and_machine_caps() {
        let mut machines = BTreeMap::new();
        machines.insert("m".to_string(), MachineSpec { crafts_per_min: num("60") });

        let mut recipes = BTreeMap::new();
        let mut r_in = BTreeMap::new();
        r_in.insert("ore".to_string(), num("1"));
        let mut r_out = BTreeMap::new();
        r_out.insert("widget".to_string(), num("1"));
        recipes.insert(
            "make".to_string(),
            RecipeSpec { machine: "m".to_string(), time_s: num("1"), inputs: r_in, out: r_out },
        );

        let mut raw_supply_per_min = BTreeMap::new();
        raw_supply_per_min.insert("ore".to_string(), num("10"));
        let mut max_machines = BTreeMap::new();
        max_machines.insert("m".to_string(), num("1"));

        let request = FactoryRequest {
            machines,
            recipes,
            modules: BTreeMap::new(),
            limits: LimitsSpec { raw_supply_per_min, max_machines },
            target: TargetSpec { item: "widget".to_string(), rate_per_min: num("1000") },
        };

        let response = solve(&request).unwrap();
        match response {
            FactoryResponse::Infeasible { max_feasible_target_per_min, bottleneck_hint } => {
                assert!(max_feasible_target_per_min > 0.0);
                assert!(!bottleneck_hint.is_empty());
            }
            other => panic!("expected Infeasible, got {other:?}"),
        }
    }

    #[test]
    fn unknown_target_item_is_rejected() {
        let request = FactoryRequest {
            machines: BTreeMap::new(),
            recipes: BTreeMap::new(),
            modules: BTreeMap::new(),
            limits: LimitsSpec::default(),
            target: TargetSpec { item: "".to_string(), rate_per_min: num("1") },
        };
        assert!(solve(&request).is_err());
    }

    #[test]
    fn productivity_module_reduces_required_crafts() {
        let mut machines = BTreeMap::new();
        machines.insert("m".to_string(), MachineSpec { crafts_per_min: num("60") });

        let mut recipes = BTreeMap::new();
        let mut r_out = BTreeMap::new();
        r_out.insert("widget".to_string(), num("1"));
        recipes.insert(
            "make".to_string(),
            RecipeSpec { machine: "m".to_string(), time_s: num("1"), inputs: BTreeMap::new(), out: r_out },
        );
        let mut modules = BTreeMap::new();
        modules.insert("m".to_string(), ModuleSpec { speed: None, prod: Some(num("1.0")) });

        let request = FactoryRequest {
            machines,
            recipes,
            modules,
            limits: LimitsSpec::default(),
            target: TargetSpec { item: "widget".to_string(), rate_per_min: num("60") },
        };

        let response = solve(&request).unwrap();
        match response {
            FactoryResponse::Ok { per_recipe_crafts_per_min, .. } => {
                // Productivity doubles output per craft, so half the crafts suffice.
                assert!((per_recipe_crafts_per_min["make"] - 30.0).abs() < 1e-6);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }
}
