//! Turns a solved [`FlowModel`] into the public response document (SPEC_FULL §4.6, §6.3)

use crate::graph::MaxFlowResult;
use crate::types::FLOW_TOLERANCE;

use super::infeasibility::{analyze, cut_reachable_names};
use super::model::FlowModel;
use super::types::{BeltsRequest, BeltsResponse, EdgeFlow};

pub fn translate(model: &FlowModel, request: &BeltsRequest, result: &MaxFlowResult) -> BeltsResponse {
    let shortfall = model.required_injection - result.max_flow;

    if shortfall > FLOW_TOLERANCE {
        let deficit = analyze(model, request, result.max_flow);
        return BeltsResponse::Infeasible {
            cut_reachable: cut_reachable_names(model),
            deficit,
        };
    }

    let mut flows = Vec::with_capacity(request.edges.len());
    for (edge, &edge_idx) in request.edges.iter().zip(&model.edge_indices) {
        let flow = edge.lo + result.network.flow_on(edge_idx);
        if flow > FLOW_TOLERANCE {
            flows.push(EdgeFlow {
                from: edge.from.clone(),
                to: edge.to.clone(),
                flow,
            });
        }
    }

    BeltsResponse::Ok {
        max_flow_per_min: model.total_supply,
        flows,
    }
}
