//! Formats solver output: clamps near-zero recipe rates, aggregates
//! machine usage and raw consumption, and derives a bottleneck hint when
//! infeasible (SPEC_FULL §4.5-§4.6)
//!
//! The bottleneck hint is recomputed directly from the solved recipe
//! rates and the same constants used to build the LP, rather than read
//! off solver-reported constraint slack -- `good_lp`'s backends don't all
//! expose one uniformly, and recomputing from the primal solution gives
//! the same answer a saturated constraint would.

use std::collections::BTreeMap;

use num_traits::ToPrimitive;

use super::preprocess::Constants;
use super::types::FactoryResponse;

const TOLERANCE: f64 = 1e-9;

pub fn success(constants: &Constants, per_recipe_raw: &BTreeMap<String, f64>) -> FactoryResponse {
    let per_recipe_crafts_per_min: BTreeMap<String, f64> = constants
        .recipe_names
        .iter()
        .map(|name| {
            let v = per_recipe_raw.get(name).copied().unwrap_or(0.0);
            (name.clone(), if v > TOLERANCE { v } else { 0.0 })
        })
        .collect();

    let mut per_machine_counts = BTreeMap::new();
    for m_type in &constants.machine_types {
        let usage = machine_usage(constants, &per_recipe_crafts_per_min, m_type);
        if usage > TOLERANCE {
            per_machine_counts.insert(m_type.clone(), usage);
        }
    }

    let mut raw_consumption_per_min = BTreeMap::new();
    for item in &constants.raw_items {
        let consumption = -net_balance(constants, &per_recipe_crafts_per_min, item);
        if consumption > TOLERANCE {
            raw_consumption_per_min.insert(item.clone(), consumption);
        }
    }

    FactoryResponse::Ok {
        per_recipe_crafts_per_min,
        per_machine_counts,
        raw_consumption_per_min,
    }
}

pub fn infeasible_at_zero() -> FactoryResponse {
    FactoryResponse::Infeasible {
        max_feasible_target_per_min: 0.0,
        bottleneck_hint: vec!["Problem is fundamentally infeasible, even at zero target rate.".to_string()],
    }
}

pub fn infeasible_at_rate(
    constants: &Constants,
    per_recipe_raw: &BTreeMap<String, f64>,
    max_rate: f64,
) -> FactoryResponse {
    let mut hints: Vec<String> = Vec::new();

    for m_type in &constants.machine_types {
        if let Some(cap) = constants.machine_caps.get(m_type).and_then(ToPrimitive::to_f64) {
            let usage = machine_usage(constants, per_recipe_raw, m_type);
            if (usage - cap).abs() < TOLERANCE {
                hints.push(format!("{m_type} cap"));
            }
        }
    }

    for item in constants.raw_caps.keys() {
        if let Some(cap) = constants.raw_caps.get(item).and_then(ToPrimitive::to_f64) {
            let balance = net_balance(constants, per_recipe_raw, item);
            if balance <= -cap + TOLERANCE {
                hints.push(format!("{item} supply"));
            }
        }
    }

    hints.sort();
    hints.dedup();
    if hints.is_empty() {
        hints.push("Unknown bottleneck".to_string());
    }

    FactoryResponse::Infeasible {
        max_feasible_target_per_min: max_rate.max(0.0),
        bottleneck_hint: hints,
    }
}

fn machine_usage(constants: &Constants, per_recipe: &BTreeMap<String, f64>, m_type: &str) -> f64 {
    constants
        .recipe_names
        .iter()
        .filter(|name| constants.recipe_machines[*name] == m_type)
        .map(|name| {
            let cost = constants.machine_costs[name].to_f64().unwrap_or(0.0);
            cost * per_recipe.get(name).copied().unwrap_or(0.0)
        })
        .sum()
}

fn net_balance(constants: &Constants, per_recipe: &BTreeMap<String, f64>, item: &str) -> f64 {
    constants
        .recipe_names
        .iter()
        .map(|name| {
            let out = constants.eff_outputs[name].get(item).and_then(ToPrimitive::to_f64).unwrap_or(0.0);
            let inp = constants.frac_inputs[name].get(item).and_then(ToPrimitive::to_f64).unwrap_or(0.0);
            (out - inp) * per_recipe.get(name).copied().unwrap_or(0.0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::types::{FactoryRequest, LimitsSpec, MachineSpec, RecipeSpec, TargetSpec};
    use serde_json::Number;
    use std::collections::BTreeMap as Map;

    fn num(s: &str) -> Number {
        s.parse().unwrap()
    }

    #[test]
    fn clamps_sub_tolerance_rates_to_zero() {
        let mut machines = Map::new();
        machines.insert("m".to_string(), MachineSpec { crafts_per_min: num("60") });
        let mut recipes = Map::new();
        let mut out = Map::new();
        out.insert("x".to_string(), num("1"));
        recipes.insert(
            "r".to_string(),
            RecipeSpec { machine: "m".to_string(), time_s: num("1"), inputs: Map::new(), out },
        );
        let request = FactoryRequest {
            machines,
            recipes,
            modules: Map::new(),
            limits: LimitsSpec::default(),
            target: TargetSpec { item: "x".to_string(), rate_per_min: num("1") },
        };
        let constants = Constants::build(&request).unwrap();

        let mut per_recipe = Map::new();
        per_recipe.insert("r".to_string(), 1e-12);
        let response = success(&constants, &per_recipe);
        match response {
            FactoryResponse::Ok { per_recipe_crafts_per_min, .. } => {
                assert_eq!(per_recipe_crafts_per_min["r"], 0.0);
            }
            _ => panic!("expected Ok"),
        }
    }
}
