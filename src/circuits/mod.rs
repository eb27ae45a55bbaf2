//! Prebuilt combinational circuits composed from the primitive gate kinds.

use std::rc::Rc;

use crate::{Circuit, GateGraph};

/// Builds a half adder.
///
/// Inputs `a`, `b`; outputs `sum`, `carry`.
pub fn half_adder() -> Circuit {
    let graph = Rc::new(GateGraph::new());
    let inputs = graph.add_inputs(2);
    let (a, b) = (inputs[0], inputs[1]);

    let sum = graph.xor(a, b);
    let carry = graph.and(a, b);

    Circuit::new(graph, &inputs, &[sum, carry]).expect("half adder is well formed")
}

/// Builds a full adder.
///
/// Inputs `a`, `b`, `c_in`; outputs `sum`, `c_out`. The `a ^ b` node fans
/// out to both outputs and is computed once per evaluation.
pub fn full_adder() -> Circuit {
    let graph = Rc::new(GateGraph::new());
    let inputs = graph.add_inputs(3);
    let (a, b, c_in) = (inputs[0], inputs[1], inputs[2]);

    let ab = graph.xor(a, b);
    let sum = graph.xor(ab, c_in);
    let carry_a = graph.and(a, b);
    let carry_b = graph.and(ab, c_in);
    let c_out = graph.or(carry_a, carry_b);

    Circuit::new(graph, &inputs, &[sum, c_out]).expect("full adder is well formed")
}

/// Builds a majority-of-three circuit.
pub fn majority3() -> Circuit {
    let graph = Rc::new(GateGraph::new());
    let inputs = graph.add_inputs(3);
    let (a, b, c) = (inputs[0], inputs[1], inputs[2]);

    let ab = graph.and(a, b);
    let ac = graph.and(a, c);
    let bc = graph.and(b, c);
    let out = graph.multi_or(&[ab, ac, bc]);

    Circuit::new(graph, &inputs, &[out]).expect("majority3 is well formed")
}
