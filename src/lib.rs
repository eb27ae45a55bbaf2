//! Combinational boolean circuits modeled as DAGs of logic gates.
//!
//! Gates live in an arena ([`GateGraph`]) and reference their inputs by
//! [`GateId`], so a gate can fan out to any number of consumers. Evaluation
//! is memoized per pass: each call to [`Circuit::evaluate`] mints one
//! [`PassToken`], and every gate node computes at most once under it no
//! matter how often it is reached, which keeps evaluation linear in the
//! number of gates even for DAGs with heavy fan-out.
//!
//! Evaluation is single-threaded: the per-node caches use `Cell` and graphs
//! are shared via `Rc`, so concurrent passes over shared gates are ruled out
//! by the type system.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use bool_circuits::{Circuit, GateGraph};
//!
//! let graph = Rc::new(GateGraph::new());
//!
//! let inputs = graph.add_inputs(3);
//! let (a, b, c) = (inputs[0], inputs[1], inputs[2]);
//!
//! // majority of three
//! let ab = graph.and(a, b);
//! let ac = graph.and(a, c);
//! let bc = graph.and(b, c);
//! let out = graph.multi_or(&[ab, ac, bc]);
//!
//! let circ = Circuit::new(graph, &inputs, &[out]).unwrap();
//!
//! assert!(!circ.evaluate_single(&[true, false, false]).unwrap());
//! assert!(circ.evaluate_single(&[true, true, false]).unwrap());
//! ```

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]

pub mod circuit;
pub mod circuits;
mod components;
pub mod graph;

pub use circuit::{Circuit, CircuitError};
pub use components::{GateId, GateKind, PassToken};
pub use graph::{GateGraph, GraphError};
