//! Max flow on a node-indexed network with real-valued capacities
//!
//! Generalizes a push-relabel (Goldberg–Tarjan) max-flow engine to
//! floating-point capacities, including `f64::INFINITY` for uncapped
//! edges. The belts solver relies on the solved [`FlowNetwork`] staying
//! around after `max_flow` returns so it can walk the residual graph for
//! an infeasibility certificate (SPEC_FULL §4.3) without re-deriving it.

use std::collections::VecDeque;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::types::{SolverStats, SolverStatus};

const FLOW_EPS: f64 = 1e-9;

/// A flow network for max-flow problems over real-valued capacities
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    /// Number of nodes
    pub num_nodes: usize,
    /// Adjacency list: `adj[u]` contains indices into `edges` for outgoing edges from `u`
    adj: Vec<Vec<usize>>,
    /// All edges (forward and reverse), interleaved as (forward, reverse) pairs
    edges: Vec<FlowEdge>,
}

/// An edge in the flow network
#[derive(Debug, Clone, Copy)]
struct FlowEdge {
    to: usize,
    capacity: f64,
    flow: f64,
    rev: usize,
}

impl FlowNetwork {
    /// Create a new flow network with `num_nodes` nodes
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            adj: vec![Vec::new(); num_nodes],
            edges: Vec::new(),
        }
    }

    /// Add a directed edge from `from` to `to` with the given (possibly
    /// infinite) capacity. Returns the index later used to read back flow.
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: f64) -> usize {
        let forward_idx = self.edges.len();
        let reverse_idx = forward_idx + 1;

        self.edges.push(FlowEdge {
            to,
            capacity,
            flow: 0.0,
            rev: reverse_idx,
        });
        self.adj[from].push(forward_idx);

        self.edges.push(FlowEdge {
            to: from,
            capacity: 0.0,
            flow: 0.0,
            rev: forward_idx,
        });
        self.adj[to].push(reverse_idx);

        forward_idx
    }

    /// Residual capacity of an edge (by index)
    pub fn residual(&self, edge_idx: usize) -> f64 {
        self.edges[edge_idx].capacity - self.edges[edge_idx].flow
    }

    /// Current flow on an edge (by index)
    pub fn flow_on(&self, edge_idx: usize) -> f64 {
        self.edges[edge_idx].flow
    }

    /// Original capacity of an edge (by index)
    pub fn capacity_of(&self, edge_idx: usize) -> f64 {
        self.edges[edge_idx].capacity
    }

    /// Target node of an edge (by index)
    pub fn target_of(&self, edge_idx: usize) -> usize {
        self.edges[edge_idx].to
    }

    /// Outgoing edge indices from a node
    pub fn edges_from(&self, node: usize) -> &[usize] {
        &self.adj[node]
    }

    fn push_flow(&mut self, edge_idx: usize, amount: f64) {
        self.edges[edge_idx].flow += amount;
        let rev = self.edges[edge_idx].rev;
        self.edges[rev].flow -= amount;
    }
}

/// Result of a max-flow computation
#[derive(Debug, Clone)]
pub struct MaxFlowResult {
    /// Maximum flow value from source to sink
    pub max_flow: f64,
    /// The network after solving, with final flow on every edge. Kept
    /// around so callers can walk the residual graph (e.g. for an
    /// infeasibility certificate) without replaying the solve.
    pub network: FlowNetwork,
    /// Solver status (always `Optimal` when returned successfully)
    pub status: SolverStatus,
    /// Diagnostics
    pub stats: SolverStats,
}

/// Solve max flow from `source` to `sink` using push-relabel.
///
/// Time complexity: O(V²E) with FIFO active-node selection.
///
/// All edges adjacent to `source` or `sink` must have finite capacity in
/// a correctly-formed instance; an edge of infinite capacity directly out
/// of `source` would make the flow value unbounded, which is reported as
/// an error rather than looping forever.
pub fn max_flow(network: &FlowNetwork, source: usize, sink: usize) -> Result<MaxFlowResult> {
    if source >= network.num_nodes || sink >= network.num_nodes {
        return Err(Error::internal("source or sink out of range"));
    }
    if source == sink {
        return Err(Error::internal("source and sink must be different"));
    }

    let start = Instant::now();
    let n = network.num_nodes;
    let mut net = network.clone();

    let mut height = vec![0usize; n];
    let mut excess = vec![0.0f64; n];
    let mut current = vec![0usize; n];

    let mut active: VecDeque<usize> = VecDeque::new();
    let mut in_queue = vec![false; n];

    height[source] = n;

    let source_edges: Vec<usize> = net.adj[source].clone();
    for edge_idx in source_edges {
        let cap = net.residual(edge_idx);
        if cap > 0.0 {
            if cap.is_infinite() {
                return Err(Error::unbounded_flow(
                    "source is adjacent to an edge of infinite capacity",
                ));
            }
            let to = net.edges[edge_idx].to;
            net.push_flow(edge_idx, cap);
            excess[to] += cap;
            excess[source] -= cap;

            if to != sink && to != source && !in_queue[to] {
                active.push_back(to);
                in_queue[to] = true;
            }
        }
    }

    let mut iterations = 0usize;
    let iteration_cap = n.saturating_mul(n).saturating_mul(net.edges.len().max(1)).max(1_000_000);

    while let Some(u) = active.pop_front() {
        in_queue[u] = false;

        let activated = discharge(&mut net, &mut height, &mut excess, &mut current, u, source, sink)?;
        iterations += 1;

        for v in activated {
            if !in_queue[v] {
                active.push_back(v);
                in_queue[v] = true;
            }
        }

        if excess[u] > FLOW_EPS && u != source && u != sink && !in_queue[u] {
            active.push_back(u);
            in_queue[u] = true;
        }

        if iterations > iteration_cap {
            return Err(Error::internal("max-flow did not converge"));
        }
    }

    let elapsed = start.elapsed().as_secs_f64();

    Ok(MaxFlowResult {
        max_flow: excess[sink],
        network: net,
        status: SolverStatus::Optimal,
        stats: SolverStats {
            solve_time_seconds: elapsed,
            iterations,
        },
    })
}

fn discharge(
    net: &mut FlowNetwork,
    height: &mut [usize],
    excess: &mut [f64],
    current: &mut [usize],
    u: usize,
    source: usize,
    sink: usize,
) -> Result<Vec<usize>> {
    let mut activated = Vec::new();
    let mut guard = 0usize;
    let guard_limit = net.edges.len() * 4 + 16;

    while excess[u] > FLOW_EPS {
        guard += 1;
        if guard > guard_limit {
            return Err(Error::internal("discharge did not converge"));
        }

        if current[u] >= net.adj[u].len() {
            relabel(net, height, u);
            current[u] = 0;
        } else {
            let edge_idx = net.adj[u][current[u]];
            let v = net.edges[edge_idx].to;
            let residual = net.residual(edge_idx);

            if residual > FLOW_EPS && height[u] == height[v] + 1 {
                let push_amount = if residual.is_infinite() {
                    excess[u]
                } else {
                    excess[u].min(residual)
                };
                net.push_flow(edge_idx, push_amount);
                excess[u] -= push_amount;

                let was_zero = excess[v] <= FLOW_EPS;
                excess[v] += push_amount;

                if was_zero && v != source && v != sink {
                    activated.push(v);
                }
            } else {
                current[u] += 1;
            }
        }
    }

    Ok(activated)
}

fn relabel(net: &FlowNetwork, height: &mut [usize], u: usize) {
    let mut min_height = usize::MAX;

    for &edge_idx in &net.adj[u] {
        if net.residual(edge_idx) > FLOW_EPS {
            let v = net.edges[edge_idx].to;
            min_height = min_height.min(height[v]);
        }
    }

    if min_height < usize::MAX {
        height[u] = min_height + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_path_bottleneck() {
        let mut net = FlowNetwork::new(3);
        net.add_edge(0, 1, 5.0);
        net.add_edge(1, 2, 3.0);

        let result = max_flow(&net, 0, 2).unwrap();
        assert!((result.max_flow - 3.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_paths_sum() {
        let mut net = FlowNetwork::new(4);
        net.add_edge(0, 1, 10.0);
        net.add_edge(1, 3, 10.0);
        net.add_edge(0, 2, 10.0);
        net.add_edge(2, 3, 10.0);

        let result = max_flow(&net, 0, 3).unwrap();
        assert!((result.max_flow - 20.0).abs() < 1e-9);
    }

    #[test]
    fn handles_interior_infinite_edge() {
        // 0 -> 1 (cap 4), 1 -> 2 (infinite), 2 -> 3 (cap 6)
        let mut net = FlowNetwork::new(4);
        net.add_edge(0, 1, 4.0);
        net.add_edge(1, 2, f64::INFINITY);
        net.add_edge(2, 3, 6.0);

        let result = max_flow(&net, 0, 3).unwrap();
        assert!((result.max_flow - 4.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_infinite_capacity_at_source() {
        let mut net = FlowNetwork::new(2);
        net.add_edge(0, 1, f64::INFINITY);

        let err = max_flow(&net, 0, 1).unwrap_err();
        assert!(matches!(err, Error::UnboundedFlow(_)));
    }
}
