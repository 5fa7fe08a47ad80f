//! Graph algorithms
//!
//! - [`flow`] - Max flow on a node-indexed network with real-valued,
//!   possibly-infinite edge capacities. Used by the belts solver's
//!   [`FlowModel`](crate::belts::model::FlowModel) after it transforms a
//!   lower-bounded feasible-flow instance into a standard max-flow instance.

pub mod flow;

pub use flow::{max_flow, FlowNetwork, MaxFlowResult};
