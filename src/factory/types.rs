//! Request/response schema for the factory solver (SPEC_FULL §6.4, §6.5)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A machine type's base throughput
#[derive(Debug, Clone, Deserialize)]
pub struct MachineSpec {
    /// Unmodified crafts per minute for one machine of this type
    pub crafts_per_min: serde_json::Number,
}

/// Speed/productivity modules installed in a machine type, additive
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleSpec {
    /// Fractional speed bonus, e.g. `0.5` for +50%
    #[serde(default)]
    pub speed: Option<serde_json::Number>,
    /// Fractional productivity bonus, applied to recipe outputs only
    #[serde(default)]
    pub prod: Option<serde_json::Number>,
}

/// A recipe: which machine runs it, how long a craft takes, and its
/// input/output item amounts per craft
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeSpec {
    /// Machine type this recipe runs on
    pub machine: String,
    /// Craft duration in seconds
    pub time_s: serde_json::Number,
    /// Input items consumed per craft
    #[serde(default, rename = "in")]
    pub inputs: BTreeMap<String, serde_json::Number>,
    /// Output items produced per craft, before productivity bonus
    #[serde(default)]
    pub out: BTreeMap<String, serde_json::Number>,
}

/// Supply and machine-count limits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitsSpec {
    /// Per-raw-item supply cap; items absent here are treated as uncapped
    #[serde(default)]
    pub raw_supply_per_min: BTreeMap<String, serde_json::Number>,
    /// Per-machine-type count cap; types absent here are treated as uncapped
    #[serde(default)]
    pub max_machines: BTreeMap<String, serde_json::Number>,
}

/// The item and rate the schedule must hit
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSpec {
    /// Item whose net production rate is constrained
    pub item: String,
    /// Target net production rate, per minute
    pub rate_per_min: serde_json::Number,
}

/// Top-level factory request document
#[derive(Debug, Clone, Deserialize)]
pub struct FactoryRequest {
    /// Machine types available
    #[serde(default)]
    pub machines: BTreeMap<String, MachineSpec>,
    /// Recipes available
    #[serde(default)]
    pub recipes: BTreeMap<String, RecipeSpec>,
    /// Per-machine-type module loadout
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleSpec>,
    /// Supply and machine-count limits
    #[serde(default)]
    pub limits: LimitsSpec,
    /// The target item and rate
    pub target: TargetSpec,
}

/// Response document for the factory solver
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FactoryResponse {
    /// A schedule hitting the target rate was found
    Ok {
        /// Crafts per minute for each recipe, zero-clamped below tolerance
        per_recipe_crafts_per_min: BTreeMap<String, f64>,
        /// Machines required per machine type, omitting types at zero usage
        per_machine_counts: BTreeMap<String, f64>,
        /// Raw item consumption per minute, omitting items at zero usage
        raw_consumption_per_min: BTreeMap<String, f64>,
    },
    /// No schedule hits the target rate
    Infeasible {
        /// The best rate a schedule can reach, ignoring the requested target
        max_feasible_target_per_min: f64,
        /// Which caps are binding at that rate
        bottleneck_hint: Vec<String>,
    },
    /// The request was malformed or invalid
    Error {
        /// Human-readable description
        message: String,
    },
}
