//! Request/response schema for the belts solver (SPEC_FULL §6.2, §6.3)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn unbounded() -> f64 {
    f64::INFINITY
}

fn zero() -> f64 {
    0.0
}

/// A supply node: `name -> { supply }`
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    /// Positive supply that must be fully delivered to the sink
    pub supply: f64,
}

/// The designated demand node
#[derive(Debug, Clone, Deserialize)]
pub struct SinkSpec {
    /// Name of the sink node
    pub name: String,
}

/// A node's throughput attributes: `name -> { capacity? }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeSpec {
    /// Maximum total inflow; absent means uncapped
    pub capacity: Option<f64>,
}

/// A directed edge `(from -> to)` with lower/upper flow bounds
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeSpec {
    /// Tail node name
    pub from: String,
    /// Head node name
    pub to: String,
    /// Minimum required flow on this edge
    #[serde(default = "zero")]
    pub lo: f64,
    /// Maximum allowed flow on this edge
    #[serde(default = "unbounded")]
    pub hi: f64,
}

/// Top-level belts request document
#[derive(Debug, Clone, Deserialize)]
pub struct BeltsRequest {
    /// Supply nodes
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSpec>,
    /// The demand node
    pub sink: SinkSpec,
    /// Per-node throughput caps
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeSpec>,
    /// Directed edges with flow bounds
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

/// A single nonzero edge flow in the response
#[derive(Debug, Clone, Serialize)]
pub struct EdgeFlow {
    /// Tail node name
    pub from: String,
    /// Head node name
    pub to: String,
    /// Flow carried on this edge
    pub flow: f64,
}

/// A tight edge on the infeasibility cut
#[derive(Debug, Clone, Serialize)]
pub struct TightEdge {
    /// Tail node name
    pub from: String,
    /// Head node name
    pub to: String,
}

/// The infeasibility certificate (SPEC_FULL §4.3, §6.3)
#[derive(Debug, Clone, Serialize)]
pub struct Deficit {
    /// Unrouted demand: `required - max_flow`
    pub demand_balance: f64,
    /// Original nodes whose split edge saturates on the cut
    pub tight_nodes: Vec<String>,
    /// Original edges saturated on the cut
    pub tight_edges: Vec<TightEdge>,
}

/// Response document for the belts solver
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BeltsResponse {
    /// A feasible routing was found
    Ok {
        /// Total flow routed, equal to the sum of source supplies
        max_flow_per_min: f64,
        /// Nonzero edge flows
        flows: Vec<EdgeFlow>,
    },
    /// No feasible routing exists
    Infeasible {
        /// Original node names reachable from the super-source in the residual graph
        cut_reachable: Vec<String>,
        /// The cut witness
        deficit: Deficit,
    },
    /// The request was malformed or invalid
    Error {
        /// Human-readable description
        message: String,
    },
}
