//! Node-splitting + lower-bound-to-maxflow transform (SPEC_FULL §4.1)
//!
//! Every original node is split into an `_in` half and an `_out` half
//! joined by a node-capacity edge. A real edge `(u, v, lo, hi)` becomes a
//! network edge `u_out -> v_in` of capacity `hi - lo`, and `lo` itself is
//! folded into each endpoint's balance `D(v)`: a node with `D(v) > 0` needs
//! that much flow injected by the super-source at its `_in` side; a node
//! with `D(v) < 0` needs that much drained by the super-sink from its
//! `_out` side. Source supply is injected the same way (it behaves like an
//! edge of lower bound `supply` arriving from nowhere), and sink demand is
//! drained the same way. Split halves are tracked through an index built
//! once over the sorted node names, not through a `_in`/`_out` naming
//! convention, so a node literally named `a_in` can't collide with it.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::graph::FlowNetwork;

use super::types::BeltsRequest;

/// Which half of a split node an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    In,
    Out,
}

/// Maps original node names to their split `_in`/`_out` network indices
#[derive(Debug, Clone)]
pub struct NodeIndexer {
    names: Vec<String>,
}

impl NodeIndexer {
    fn build(mut names: Vec<String>) -> Self {
        names.sort();
        names.dedup();
        Self { names }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).ok()
    }

    /// Network index of `name`'s `_in` half
    pub fn in_index(&self, name: &str) -> Option<usize> {
        self.position(name).map(|p| p * 2)
    }

    /// Network index of `name`'s `_out` half
    pub fn out_index(&self, name: &str) -> Option<usize> {
        self.position(name).map(|p| p * 2 + 1)
    }

    /// Network index of the super-source
    pub fn super_source(&self) -> usize {
        self.names.len() * 2
    }

    /// Network index of the super-sink
    pub fn super_sink(&self) -> usize {
        self.names.len() * 2 + 1
    }

    /// Total number of nodes in the split network
    pub fn num_nodes(&self) -> usize {
        self.super_sink() + 1
    }

    /// Recover the original node name and side for a network index; `None`
    /// for the super-source/super-sink.
    pub fn original(&self, idx: usize) -> Option<(&str, Side)> {
        if idx >= self.super_source() {
            return None;
        }
        let side = if idx % 2 == 0 { Side::In } else { Side::Out };
        self.names.get(idx / 2).map(|n| (n.as_str(), side))
    }

    /// All original node names, in sorted order
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// The split max-flow network built from a belts request
pub struct FlowModel {
    pub network: FlowNetwork,
    pub indexer: NodeIndexer,
    /// Network edge index for each original request edge, in request order
    pub edge_indices: Vec<usize>,
    /// Network edge index of each node's `_in -> _out` capacity edge
    pub node_cap_edges: HashMap<String, usize>,
    /// Total supply declared by `sources`; also the demand the sink must absorb
    pub total_supply: f64,
    /// Sum of positive `D(v)` terms; the max flow must reach this for feasibility
    pub required_injection: f64,
}

impl FlowModel {
    pub fn build(request: &BeltsRequest) -> Result<Self> {
        if request.sources.is_empty() {
            return Err(Error::invalid_input("sources must not be empty"));
        }
        if request.edges.is_empty() {
            return Err(Error::invalid_input("edges must not be empty"));
        }
        if request.sink.name.trim().is_empty() {
            return Err(Error::invalid_input("sink name must not be empty"));
        }

        let mut names: Vec<String> = request.sources.keys().cloned().collect();
        names.extend(request.nodes.keys().cloned());
        names.push(request.sink.name.clone());
        for edge in &request.edges {
            names.push(edge.from.clone());
            names.push(edge.to.clone());
        }
        let indexer = NodeIndexer::build(names);

        let mut network = FlowNetwork::new(indexer.num_nodes());
        let mut balance: HashMap<String, f64> = HashMap::new();
        let mut node_cap_edges = HashMap::new();

        for name in indexer.names() {
            let cap = request
                .nodes
                .get(name)
                .and_then(|n| n.capacity)
                .unwrap_or(f64::INFINITY);
            if cap < 0.0 {
                return Err(Error::invalid_input(format!("node '{name}' has negative capacity")));
            }
            let edge_idx = network.add_edge(
                indexer.in_index(name).expect("name indexed"),
                indexer.out_index(name).expect("name indexed"),
                cap,
            );
            node_cap_edges.insert(name.clone(), edge_idx);
        }

        let mut edge_indices = Vec::with_capacity(request.edges.len());
        for edge in &request.edges {
            if edge.lo < 0.0 {
                return Err(Error::invalid_input(format!(
                    "edge {}->{} has a negative lower bound",
                    edge.from, edge.to
                )));
            }
            if edge.hi < edge.lo {
                return Err(Error::invalid_input(format!(
                    "edge {}->{} has hi < lo",
                    edge.from, edge.to
                )));
            }
            let u_out = indexer
                .out_index(&edge.from)
                .ok_or_else(|| Error::invalid_input(format!("unknown node '{}'", edge.from)))?;
            let v_in = indexer
                .in_index(&edge.to)
                .ok_or_else(|| Error::invalid_input(format!("unknown node '{}'", edge.to)))?;

            let residual_cap = if edge.hi.is_infinite() {
                f64::INFINITY
            } else {
                edge.hi - edge.lo
            };
            let edge_idx = network.add_edge(u_out, v_in, residual_cap);
            edge_indices.push(edge_idx);

            *balance.entry(edge.to.clone()).or_insert(0.0) += edge.lo;
            *balance.entry(edge.from.clone()).or_insert(0.0) -= edge.lo;
        }

        let mut total_supply = 0.0;
        for (name, source) in &request.sources {
            if source.supply <= 0.0 {
                return Err(Error::invalid_input(format!(
                    "source '{name}' must have positive supply"
                )));
            }
            total_supply += source.supply;
            *balance.entry(name.clone()).or_insert(0.0) += source.supply;
        }
        *balance.entry(request.sink.name.clone()).or_insert(0.0) -= total_supply;

        let super_source = indexer.super_source();
        let super_sink = indexer.super_sink();
        let mut required_injection = 0.0;

        for name in indexer.names() {
            let d = *balance.get(name).unwrap_or(&0.0);
            if d > 0.0 {
                let target = indexer.in_index(name).expect("name indexed");
                network.add_edge(super_source, target, d);
                required_injection += d;
            } else if d < 0.0 {
                let origin = indexer.out_index(name).expect("name indexed");
                network.add_edge(origin, super_sink, -d);
            }
        }

        Ok(Self {
            network,
            indexer,
            edge_indices,
            node_cap_edges,
            total_supply,
            required_injection,
        })
    }
}
