//! Infeasibility certificate: residual-graph reachability from the
//! super-source identifies the min cut (SPEC_FULL §4.3)

use std::collections::{HashSet, VecDeque};

use crate::graph::FlowNetwork;
use crate::types::FLOW_TOLERANCE;

use super::model::FlowModel;
use super::types::{BeltsRequest, Deficit, TightEdge};

/// Nodes reachable from the super-source over residual (non-saturated) edges
pub fn reachable_from_source(network: &FlowNetwork, super_source: usize) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(super_source);
    queue.push_back(super_source);

    while let Some(u) = queue.pop_front() {
        for &edge_idx in network.edges_from(u) {
            if network.residual(edge_idx) > FLOW_TOLERANCE {
                let v = network.target_of(edge_idx);
                if seen.insert(v) {
                    queue.push_back(v);
                }
            }
        }
    }

    seen
}

/// Build the infeasibility certificate from a network solved short of demand
pub fn analyze(model: &FlowModel, request: &BeltsRequest, max_flow: f64) -> Deficit {
    let reachable = reachable_from_source(&model.network, model.indexer.super_source());

    let mut tight_nodes = Vec::new();
    for name in model.indexer.names() {
        let in_idx = model.indexer.in_index(name).expect("indexed");
        let out_idx = model.indexer.out_index(name).expect("indexed");
        if reachable.contains(&in_idx) && !reachable.contains(&out_idx) {
            let edge_idx = model.node_cap_edges[name];
            if model.network.residual(edge_idx) <= FLOW_TOLERANCE {
                tight_nodes.push(name.clone());
            }
        }
    }

    let mut tight_edges = Vec::new();
    for (edge, &edge_idx) in request.edges.iter().zip(&model.edge_indices) {
        let u_out = model.indexer.out_index(&edge.from).expect("validated in model::build");
        let v_in = model.indexer.in_index(&edge.to).expect("validated in model::build");
        if reachable.contains(&u_out)
            && !reachable.contains(&v_in)
            && model.network.residual(edge_idx) <= FLOW_TOLERANCE
        {
            tight_edges.push(TightEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
            });
        }
    }

    Deficit {
        demand_balance: model.required_injection - max_flow,
        tight_nodes,
        tight_edges,
    }
}

/// Original node names reachable from the super-source, by their `_in` side
pub fn cut_reachable_names(model: &FlowModel) -> Vec<String> {
    let reachable = reachable_from_source(&model.network, model.indexer.super_source());
    model
        .indexer
        .names()
        .iter()
        .filter(|name| {
            model
                .indexer
                .in_index(name)
                .map(|idx| reachable.contains(&idx))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belts::types::{EdgeSpec, NodeSpec, SinkSpec, SourceSpec};
    use std::collections::BTreeMap;

    fn request() -> BeltsRequest {
        let mut sources = BTreeMap::new();
        sources.insert("a".to_string(), SourceSpec { supply: 10.0 });
        BeltsRequest {
            sources,
            sink: SinkSpec { name: "z".to_string() },
            nodes: BTreeMap::new(),
            edges: vec![EdgeSpec {
                from: "a".to_string(),
                to: "z".to_string(),
                lo: 0.0,
                hi: 4.0,
            }],
        }
    }

    #[test]
    fn reports_tight_edge_on_undercapacity_route() {
        let req = request();
        let model = FlowModel::build(&req).unwrap();
        let result = crate::graph::max_flow(
            &model.network,
            model.indexer.super_source(),
            model.indexer.super_sink(),
        )
        .unwrap();

        let deficit = analyze(&model, &req, result.max_flow);
        assert!((deficit.demand_balance - 6.0).abs() < 1e-6);
        assert_eq!(deficit.tight_edges.len(), 1);
        assert_eq!(deficit.tight_edges[0].from, "a");
        assert_eq!(deficit.tight_edges[0].to, "z");
    }

    #[test]
    fn ignores_unused_node_spec() {
        let mut req = request();
        req.nodes.insert("a".to_string(), NodeSpec { capacity: Some(100.0) });
        let model = FlowModel::build(&req).unwrap();
        assert!(model.node_cap_edges.contains_key("a"));
    }
}
