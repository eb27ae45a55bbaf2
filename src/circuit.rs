//! Circuits: named input/output views over a gate graph.

use std::fmt;
use std::rc::Rc;

use tracing::instrument;

use crate::components::{GateId, GateKind};
use crate::graph::GateGraph;

/// An error that can occur when constructing or calling a circuit.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum CircuitError {
    #[error("wrong number of values: expected {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("{0} is not an input gate and cannot be a circuit input")]
    NotAnInput(GateId),
    #[error("unknown gate {0}")]
    UnknownGate(GateId),
    #[error("expected a single-output circuit, got {0} outputs")]
    NotSingleOutput(usize),
}

/// A combinational circuit: designated inputs and outputs over a shared
/// gate graph.
///
/// A circuit does not own its gates. The graph is shared via `Rc`, so the
/// same gates may be designated by other circuits or retained independently;
/// the only mutation a circuit performs is writing its input gates' states
/// during [`evaluate`](Circuit::evaluate).
#[derive(Clone)]
pub struct Circuit {
    graph: Rc<GateGraph>,
    inputs: Vec<GateId>,
    outputs: Vec<GateId>,
}

impl Circuit {
    /// Creates a circuit from ordered designated inputs and outputs.
    ///
    /// Every designated input must be an `Input`-kind gate of `graph`;
    /// outputs may be any gate of `graph`.
    pub fn new(
        graph: Rc<GateGraph>,
        inputs: &[GateId],
        outputs: &[GateId],
    ) -> Result<Self, CircuitError> {
        for &id in inputs.iter().chain(outputs) {
            if id.0 >= graph.len() {
                return Err(CircuitError::UnknownGate(id));
            }
        }
        for &id in inputs {
            if graph.kind(id) != GateKind::Input {
                return Err(CircuitError::NotAnInput(id));
            }
        }

        Ok(Self {
            graph,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        })
    }

    /// Returns the graph the circuit's gates live in.
    pub fn graph(&self) -> &Rc<GateGraph> {
        &self.graph
    }

    /// Returns the designated inputs, in declaration order.
    pub fn inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// Returns the designated outputs, in declaration order.
    pub fn outputs(&self) -> &[GateId] {
        &self.outputs
    }

    /// Returns the number of designated inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the number of designated outputs.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Evaluates the circuit with the given input values.
    ///
    /// Writes each value into the corresponding input gate in declaration
    /// order, then evaluates every output under one fresh pass token, so
    /// each gate node computes at most once even when outputs share
    /// sub-circuits. Returns the output values in declaration order.
    #[instrument(level = "trace", skip(self))]
    pub fn evaluate(&self, values: &[bool]) -> Result<Vec<bool>, CircuitError> {
        if values.len() != self.inputs.len() {
            return Err(CircuitError::ArityMismatch {
                expected: self.inputs.len(),
                actual: values.len(),
            });
        }

        // inputs were validated at construction
        for (&id, &value) in self.inputs.iter().zip(values) {
            self.graph.set_state(id, value);
        }

        let token = self.graph.begin_pass();
        Ok(self
            .outputs
            .iter()
            .map(|&output| self.graph.value_in(output, token))
            .collect())
    }

    /// Evaluates a single-output circuit, returning the one output value.
    ///
    /// Fails if the circuit does not have exactly one designated output.
    pub fn evaluate_single(&self, values: &[bool]) -> Result<bool, CircuitError> {
        if self.outputs.len() != 1 {
            return Err(CircuitError::NotSingleOutput(self.outputs.len()));
        }
        Ok(self.evaluate(values)?[0])
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Circuit")
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .field("graph", &self.graph)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    /// Majority-of-three: d = a&b, e = a&c, f = b&c, out = d|e|f.
    fn majority() -> Circuit {
        let graph = Rc::new(GateGraph::new());
        let inputs = graph.add_inputs(3);
        let (a, b, c) = (inputs[0], inputs[1], inputs[2]);
        let d = graph.and(a, b);
        let e = graph.and(a, c);
        let f = graph.and(b, c);
        let out = graph.multi_or(&[d, e, f]);
        Circuit::new(graph, &inputs, &[out]).unwrap()
    }

    #[rstest]
    #[case(true, false, false, false)]
    #[case(true, true, false, true)]
    #[case(false, false, false, false)]
    #[case(true, true, true, true)]
    fn test_majority_end_to_end(
        #[case] a: bool,
        #[case] b: bool,
        #[case] c: bool,
        #[case] expected: bool,
    ) {
        let circ = majority();
        assert_eq!(circ.evaluate_single(&[a, b, c]).unwrap(), expected);
    }

    #[test]
    fn test_call_arity_mismatch() {
        let circ = majority();
        assert!(matches!(
            circ.evaluate(&[true, false]).unwrap_err(),
            CircuitError::ArityMismatch {
                expected: 3,
                actual: 2,
            }
        ));
        assert!(matches!(
            circ.evaluate(&[true, false, true, false]).unwrap_err(),
            CircuitError::ArityMismatch {
                expected: 3,
                actual: 4,
            }
        ));
    }

    #[test]
    fn test_derived_gate_rejected_as_input() {
        let graph = Rc::new(GateGraph::new());
        let (a, b) = (graph.add_input(false), graph.add_input(false));
        let and = graph.and(a, b);

        let err = Circuit::new(graph, &[a, and], &[and]).unwrap_err();
        assert!(matches!(err, CircuitError::NotAnInput(id) if id == and));
    }

    #[test]
    fn test_const_gate_rejected_as_input() {
        let graph = Rc::new(GateGraph::new());
        let a = graph.add_input(false);
        let t = graph.add_const(true);
        let or = graph.or(a, t);

        let err = Circuit::new(graph, &[a, t], &[or]).unwrap_err();
        assert!(matches!(err, CircuitError::NotAnInput(id) if id == t));
    }

    #[test]
    fn test_foreign_id_rejected() {
        let graph = Rc::new(GateGraph::new());
        let a = graph.add_input(false);

        let other = GateGraph::new();
        let foreign_inputs = other.add_inputs(8);
        let foreign = *foreign_inputs.last().unwrap();

        let err = Circuit::new(graph, &[a], &[foreign]).unwrap_err();
        assert!(matches!(err, CircuitError::UnknownGate(id) if id == foreign));
    }

    #[test]
    fn test_multi_output_shares_one_pass() {
        let graph = Rc::new(GateGraph::new());
        let inputs = graph.add_inputs(2);
        let (a, b) = (inputs[0], inputs[1]);

        // shared node feeding both outputs
        let x = graph.xor(a, b);
        let y = graph.and(x, a);
        let z = graph.or(x, b);

        let circ = Circuit::new(graph.clone(), &inputs, &[y, z]).unwrap();

        circ.evaluate(&[true, false]).unwrap();
        assert_eq!(graph.evaluation_count(x), 1);

        circ.evaluate(&[false, true]).unwrap();
        assert_eq!(graph.evaluation_count(x), 2);
    }

    #[test]
    fn test_multi_output_order() {
        let graph = Rc::new(GateGraph::new());
        let inputs = graph.add_inputs(2);
        let (a, b) = (inputs[0], inputs[1]);
        let circ = Circuit::new(
            graph.clone(),
            &inputs,
            &[graph.xor(a, b), graph.and(a, b), graph.or(a, b)],
        )
        .unwrap();

        assert_eq!(
            circ.evaluate(&[true, true]).unwrap(),
            vec![false, true, true]
        );
    }

    #[test]
    fn test_reevaluation_after_state_change() {
        let circ = majority();
        assert!(circ.evaluate_single(&[true, true, false]).unwrap());
        assert!(!circ.evaluate_single(&[true, false, false]).unwrap());
        assert!(circ.evaluate_single(&[false, true, true]).unwrap());
    }

    #[test]
    fn test_evaluate_single_requires_one_output() {
        let graph = Rc::new(GateGraph::new());
        let inputs = graph.add_inputs(2);
        let (a, b) = (inputs[0], inputs[1]);
        let circ = Circuit::new(graph.clone(), &inputs, &[graph.and(a, b), graph.or(a, b)])
            .unwrap();

        assert!(matches!(
            circ.evaluate_single(&[true, true]).unwrap_err(),
            CircuitError::NotSingleOutput(2)
        ));
    }

    #[test]
    fn test_circuits_sharing_a_graph() {
        let graph = Rc::new(GateGraph::new());
        let inputs = graph.add_inputs(2);
        let (a, b) = (inputs[0], inputs[1]);
        let x = graph.xor(a, b);

        let xor_circ = Circuit::new(graph.clone(), &inputs, &[x]).unwrap();
        let nxor_circ = Circuit::new(graph.clone(), &inputs, &[graph.not(x)]).unwrap();

        assert!(xor_circ.evaluate_single(&[true, false]).unwrap());
        assert!(!nxor_circ.evaluate_single(&[true, false]).unwrap());
        assert!(!xor_circ.evaluate_single(&[true, true]).unwrap());
        assert!(nxor_circ.evaluate_single(&[true, true]).unwrap());
    }
}
