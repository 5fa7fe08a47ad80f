//! Exact-rational preprocessing of recipe/machine/module constants
//! (SPEC_FULL §4.4)
//!
//! Every numeric constant is parsed out of its original JSON literal text
//! into a [`BigRational`] before any arithmetic touches it, so that e.g. a
//! `0.1` productivity bonus stays exactly `1/10` through every recipe's
//! effective-output computation. The one lossy float conversion happens
//! later, at LP-model-build time ([`crate::rational::to_f64`]).

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::rational::number_to_rational;

use super::types::FactoryRequest;

/// A non-positive effective craft rate can never be satisfied; such a
/// recipe is given this prohibitive machine cost instead of a division
/// by zero, so the optimizer avoids it without the model blowing up.
fn prohibitive_cost() -> BigRational {
    BigRational::from_integer(BigInt::from(10).pow(30))
}

/// All recipe/machine/module constants, preprocessed once per request
#[derive(Debug, Clone)]
pub struct Constants {
    pub recipe_names: Vec<String>,
    pub machine_types: Vec<String>,
    pub raw_items: BTreeSet<String>,
    pub intermediate_items: BTreeSet<String>,
    pub all_items: Vec<String>,
    pub target_item: String,
    pub eff_outputs: BTreeMap<String, BTreeMap<String, BigRational>>,
    pub frac_inputs: BTreeMap<String, BTreeMap<String, BigRational>>,
    pub machine_costs: BTreeMap<String, BigRational>,
    pub recipe_machines: BTreeMap<String, String>,
    pub raw_caps: BTreeMap<String, BigRational>,
    pub machine_caps: BTreeMap<String, BigRational>,
}

impl Constants {
    pub fn build(request: &FactoryRequest) -> Result<Self> {
        let target_item = request.target.item.clone();
        if target_item.trim().is_empty() {
            return Err(Error::invalid_input("target item must not be empty"));
        }

        let recipe_names: Vec<String> = request.recipes.keys().cloned().collect();
        let machine_types: Vec<String> = request.limits.max_machines.keys().cloned().collect();
        let raw_items: BTreeSet<String> = request.limits.raw_supply_per_min.keys().cloned().collect();

        let one = BigRational::from_integer(1.into());
        let sixty = BigRational::from_integer(60.into());

        let mut eff_outputs = BTreeMap::new();
        let mut frac_inputs = BTreeMap::new();
        let mut machine_costs = BTreeMap::new();
        let mut recipe_machines = BTreeMap::new();
        let mut all_items: BTreeSet<String> = BTreeSet::new();
        let mut all_produced_items: BTreeSet<String> = BTreeSet::new();

        for (r_name, r_data) in &request.recipes {
            let machine = request.machines.get(&r_data.machine).ok_or_else(|| {
                Error::invalid_input(format!(
                    "recipe '{r_name}' uses unknown machine '{}'",
                    r_data.machine
                ))
            })?;
            let module = request.modules.get(&r_data.machine);

            let speed_mod = match module.and_then(|m| m.speed.as_ref()) {
                Some(n) => number_to_rational(n)?,
                None => BigRational::zero(),
            };
            let prod_mod = match module.and_then(|m| m.prod.as_ref()) {
                Some(n) => number_to_rational(n)?,
                None => BigRational::zero(),
            };
            let base_speed = number_to_rational(&machine.crafts_per_min)?;
            let time_s = number_to_rational(&r_data.time_s)?;

            if time_s <= BigRational::zero() {
                return Err(Error::invalid_input(format!(
                    "recipe '{r_name}' has invalid time_s <= 0"
                )));
            }

            let eff_crafts_per_min = &base_speed * (&one + &speed_mod) * &sixty / &time_s;

            let cost = if eff_crafts_per_min <= BigRational::zero() {
                prohibitive_cost()
            } else {
                &one / &eff_crafts_per_min
            };
            machine_costs.insert(r_name.clone(), cost);
            recipe_machines.insert(r_name.clone(), r_data.machine.clone());

            let mut outs = BTreeMap::new();
            for (item, amount) in &r_data.out {
                let frac_amount = number_to_rational(amount)?;
                outs.insert(item.clone(), frac_amount * (&one + &prod_mod));
                all_items.insert(item.clone());
                all_produced_items.insert(item.clone());
            }
            eff_outputs.insert(r_name.clone(), outs);

            let mut ins = BTreeMap::new();
            for (item, amount) in &r_data.inputs {
                ins.insert(item.clone(), number_to_rational(amount)?);
                all_items.insert(item.clone());
            }
            frac_inputs.insert(r_name.clone(), ins);
        }

        let mut intermediate_items: BTreeSet<String> = all_produced_items
            .difference(&raw_items)
            .filter(|item| **item != target_item)
            .cloned()
            .collect();
        if all_produced_items.contains(&target_item) {
            intermediate_items.insert(target_item.clone());
        }

        let mut raw_caps = BTreeMap::new();
        for (item, cap) in &request.limits.raw_supply_per_min {
            raw_caps.insert(item.clone(), number_to_rational(cap)?);
        }
        let mut machine_caps = BTreeMap::new();
        for (m_type, cap) in &request.limits.max_machines {
            machine_caps.insert(m_type.clone(), number_to_rational(cap)?);
        }

        Ok(Self {
            recipe_names,
            machine_types,
            raw_items,
            intermediate_items,
            all_items: all_items.into_iter().collect(),
            target_item,
            eff_outputs,
            frac_inputs,
            machine_costs,
            recipe_machines,
            raw_caps,
            machine_caps,
        })
    }
}
