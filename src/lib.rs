//! # line-balance
//!
//! Production-planning solvers for two related problems:
//!
//! - [`belts`] - can every source's declared supply reach the sink through
//!   a capacitated network without violating edge flow bounds? Modeled as
//!   a feasible-flow-with-lower-bounds instance reduced to max flow.
//! - [`factory`] - what steady-state recipe schedule hits a target output
//!   rate using the fewest machines, and if none does, why not? Modeled as
//!   a linear program over recipe activity levels.
//!
//! ## Quick Start
//!
//! ```rust
//! use line_balance::belts::{solve, BeltsRequest};
//! use std::collections::BTreeMap;
//!
//! let request: BeltsRequest = serde_json::from_str(r#"{
//!     "sources": {"a": {"supply": 5.0}},
//!     "sink": {"name": "t"},
//!     "nodes": {},
//!     "edges": [{"from": "a", "to": "t", "hi": 10.0}]
//! }"#).unwrap();
//!
//! let response = solve(&request).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod belts;
pub mod factory;
pub mod graph;
pub mod rational;

mod error;
mod types;

pub use error::{Error, Result};
pub use types::*;

/// Common imports for consumers embedding either solver as a library
pub mod prelude {
    pub use crate::belts::{solve as solve_belts, BeltsRequest, BeltsResponse};
    pub use crate::factory::{solve as solve_factory, FactoryRequest, FactoryResponse};
    pub use crate::Error;
    pub use crate::Result;
}
