//! Feasible-flow routing: can every source's declared supply reach the
//! sink without violating node throughput caps or edge flow bounds?
//! (SPEC_FULL §4.1-§4.3, §6.2-§6.3)

pub mod infeasibility;
pub mod model;
pub mod translate;
pub mod types;

use tracing::info;

use crate::error::Result;
use crate::graph::max_flow;

pub use types::{BeltsRequest, BeltsResponse};

/// Solve a belts request end to end: build the split network, run max
/// flow, and translate the result into the response document.
pub fn solve(request: &BeltsRequest) -> Result<BeltsResponse> {
    let built = model::FlowModel::build(request)?;
    let result = max_flow(
        &built.network,
        built.indexer.super_source(),
        built.indexer.super_sink(),
    )?;

    info!(
        nodes = built.indexer.num_nodes(),
        edges = request.edges.len(),
        iterations = result.stats.iterations,
        solve_time_seconds = result.stats.solve_time_seconds,
        "belts solve complete"
    );

    Ok(translate::translate(&built, request, &result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belts::types::{EdgeSpec, NodeSpec, SinkSpec, SourceSpec};
    use std::collections::BTreeMap;

    #[test]
    fn two_source_merge_is_feasible() {
        let mut sources = BTreeMap::new();
        sources.insert("s1".to_string(), SourceSpec { supply: 5.0 });
        sources.insert("s2".to_string(), SourceSpec { supply: 5.0 });
        let request = BeltsRequest {
            sources,
            sink: SinkSpec { name: "t".to_string() },
            nodes: BTreeMap::new(),
            edges: vec![
                EdgeSpec { from: "s1".to_string(), to: "t".to_string(), lo: 0.0, hi: 5.0 },
                EdgeSpec { from: "s2".to_string(), to: "t".to_string(), lo: 0.0, hi: 5.0 },
            ],
        };

        let response = solve(&request).unwrap();
        match response {
            BeltsResponse::Ok { max_flow_per_min, flows } => {
                assert!((max_flow_per_min - 10.0).abs() < 1e-6);
                assert_eq!(flows.len(), 2);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn diamond_with_bottleneck_is_infeasible() {
        let mut sources = BTreeMap::new();
        sources.insert("s".to_string(), SourceSpec { supply: 10.0 });
        let mut nodes = BTreeMap::new();
        nodes.insert("m".to_string(), NodeSpec { capacity: Some(4.0) });
        let request = BeltsRequest {
            sources,
            sink: SinkSpec { name: "t".to_string() },
            nodes,
            edges: vec![
                EdgeSpec { from: "s".to_string(), to: "m".to_string(), lo: 0.0, hi: f64::INFINITY },
                EdgeSpec { from: "m".to_string(), to: "t".to_string(), lo: 0.0, hi: f64::INFINITY },
            ],
        };

        let response = solve(&request).unwrap();
        match response {
            BeltsResponse::Infeasible { deficit, .. } => {
                assert!((deficit.demand_balance - 6.0).abs() < 1e-6);
                assert_eq!(deficit.tight_nodes, vec!["m".to_string()]);
            }
            other => panic!("expected Infeasible, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_sources() {
        let request = BeltsRequest {
            sources: BTreeMap::new(),
            sink: SinkSpec { name: "t".to_string() },
            nodes: BTreeMap::new(),
            edges: Vec::new(),
        };
        assert!(solve(&request).is_err());
    }

    #[test]
    fn rejects_empty_edges() {
        let mut sources = BTreeMap::new();
        sources.insert("s".to_string(), SourceSpec { supply: 5.0 });
        let request = BeltsRequest {
            sources,
            sink: SinkSpec { name: "t".to_string() },
            nodes: BTreeMap::new(),
            edges: Vec::new(),
        };
        assert!(solve(&request).is_err());
    }
}
