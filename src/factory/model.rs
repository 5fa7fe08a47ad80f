//! Builds the recipe-activity linear program for either solver mode
//! (SPEC_FULL §4.4)
//!
//! Two modes share this builder: `Optimize` fixes the target item's net
//! rate and minimizes total machine usage; `MaximizeRate` drops the fixed
//! rate in favor of a free variable the objective maximizes, used to find
//! how close to the requested rate a schedule can actually get.

use std::collections::BTreeMap;

use good_lp::{constraint::Constraint, variable, Expression, ProblemVariables, Variable};

use crate::rational::to_f64;

use super::preprocess::Constants;

/// Which LP is being built
pub enum Mode {
    /// Fix the target rate, minimize machine usage
    Optimize { target_rate: f64 },
    /// Free the target rate, maximize it
    MaximizeRate,
}

/// A built (but not yet solved) linear program
pub struct BuiltModel {
    pub variables: ProblemVariables,
    pub recipe_vars: BTreeMap<String, Variable>,
    pub target_rate_var: Variable,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
}

pub fn build(constants: &Constants, mode: &Mode) -> BuiltModel {
    let mut variables = ProblemVariables::new();
    let recipe_vars: BTreeMap<String, Variable> = constants
        .recipe_names
        .iter()
        .map(|name| (name.clone(), variables.add(variable().min(0.0))))
        .collect();
    let target_rate_var = variables.add(variable().min(0.0));

    let objective = match mode {
        Mode::Optimize { .. } => {
            let mut expr = Expression::from(0.0);
            for name in &constants.recipe_names {
                expr += to_f64(&constants.machine_costs[name]) * recipe_vars[name];
            }
            expr
        }
        Mode::MaximizeRate => target_rate_var.into(),
    };

    let mut constraints = Vec::new();

    for item in &constants.all_items {
        let mut balance = Expression::from(0.0);
        for name in &constants.recipe_names {
            let out = constants.eff_outputs[name].get(item).map(to_f64).unwrap_or(0.0);
            let inp = constants.frac_inputs[name].get(item).map(to_f64).unwrap_or(0.0);
            let coeff = out - inp;
            if coeff != 0.0 {
                balance += coeff * recipe_vars[name];
            }
        }

        if *item == constants.target_item {
            match mode {
                Mode::Optimize { target_rate } => constraints.push(balance.eq(*target_rate)),
                Mode::MaximizeRate => constraints.push(balance.eq(target_rate_var)),
            }
        } else if constants.intermediate_items.contains(item) {
            constraints.push(balance.eq(0.0));
        } else if constants.raw_items.contains(item) {
            constraints.push(balance.clone().leq(0.0));
            if let Some(cap) = constants.raw_caps.get(item) {
                constraints.push(balance.geq(-to_f64(cap)));
            }
        }
    }

    for m_type in &constants.machine_types {
        if let Some(cap) = constants.machine_caps.get(m_type) {
            let mut usage = Expression::from(0.0);
            for name in &constants.recipe_names {
                if constants.recipe_machines[name] == *m_type {
                    usage += to_f64(&constants.machine_costs[name]) * recipe_vars[name];
                }
            }
            constraints.push(usage.leq(to_f64(cap)));
        }
    }

    BuiltModel {
        variables,
        recipe_vars,
        target_rate_var,
        objective,
        constraints,
    }
}
