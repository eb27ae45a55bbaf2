//! The gate arena and evaluation engine.

use std::cell::{Cell, RefCell};
use std::fmt;

use tracing::trace;

use crate::components::{GateId, GateKind, PassToken};

/// An error that can occur when constructing gates or setting input state.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum GraphError {
    #[error("arity mismatch for {kind} gate: expected {expected} inputs, got {actual}")]
    ArityMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid truth table mode {0}, must be in 0..=15")]
    InvalidMode(u8),
    #[error("{0} is not an input gate")]
    NotAnInput(GateId),
}

/// A gate node in the arena.
///
/// The cache fields are `Cell`s so evaluation can run over a shared borrow
/// of the arena. A node's cache is private to that node: evaluating a gate
/// only ever writes the caches of the gates beneath it.
struct GateNode {
    kind: GateKind,
    inputs: Vec<GateId>,
    /// Externally set value, meaningful for `Input` kind only.
    state: Cell<bool>,
    /// Generation of the pass the cache was filled under. 0 means never.
    last_pass: Cell<u64>,
    cached: Cell<bool>,
    /// Number of times this node's function has been computed.
    evals: Cell<u64>,
}

impl GateNode {
    fn new(kind: GateKind, inputs: Vec<GateId>) -> Self {
        Self {
            kind,
            inputs,
            state: Cell::new(false),
            last_pass: Cell::new(0),
            cached: Cell::new(false),
            evals: Cell::new(0),
        }
    }
}

/// An arena of gate nodes forming a combinational DAG.
///
/// Gates are appended through the constructor methods and referenced by
/// [`GateId`]. Using a gate as an input to more than one consumer shares it:
/// the graph is a DAG, not a tree, and evaluation computes each shared node
/// at most once per pass.
///
/// Evaluation is single-threaded by construction: the caches are `Cell`s, so
/// the graph is not `Sync` and concurrent passes over shared nodes are ruled
/// out at compile time.
///
/// # Cycles
///
/// Ids are expected to come from this graph, and the constructor methods can
/// only reference gates that already exist, so a graph built through them is
/// acyclic. Evaluating a cyclic graph does not terminate; this is a caller
/// precondition, not a checked error.
#[derive(Default)]
pub struct GateGraph {
    nodes: RefCell<Vec<GateNode>>,
    /// Generation counter the pass tokens are minted from.
    pass: Cell<u64>,
}

impl GateGraph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of gates in the graph.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Returns `true` if the graph contains no gates.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Returns the kind of the gate.
    pub fn kind(&self, id: GateId) -> GateKind {
        self.nodes.borrow()[id.0].kind
    }

    /// Returns the ordered inputs of the gate.
    pub fn inputs(&self, id: GateId) -> Vec<GateId> {
        self.nodes.borrow()[id.0].inputs.clone()
    }

    /// Returns the number of times the gate's function has been computed.
    ///
    /// Within one pass a gate computes at most once regardless of fan-out,
    /// so this counts passes that reached the gate. Diagnostic surface.
    pub fn evaluation_count(&self, id: GateId) -> u64 {
        self.nodes.borrow()[id.0].evals.get()
    }

    fn push(&self, node: GateNode) -> GateId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        GateId(nodes.len() - 1)
    }

    /// Adds an input gate with the given initial state.
    pub fn add_input(&self, state: bool) -> GateId {
        let node = GateNode::new(GateKind::Input, vec![]);
        node.state.set(state);
        self.push(node)
    }

    /// Adds `n` input gates, all initially false.
    pub fn add_inputs(&self, n: usize) -> Vec<GateId> {
        (0..n).map(|_| self.add_input(false)).collect()
    }

    /// Adds a constant gate.
    pub fn add_const(&self, value: bool) -> GateId {
        self.push(GateNode::new(GateKind::Const(value), vec![]))
    }

    /// Adds a gate of the given kind.
    ///
    /// Fixed-arity kinds require exactly `kind.arity()` inputs; the
    /// multi-input kinds accept any number and take their arity from it.
    /// A `Custom` kind requires a mode in `0..=15`.
    pub fn add_gate(&self, kind: GateKind, inputs: &[GateId]) -> Result<GateId, GraphError> {
        if let GateKind::Custom(mode) = kind {
            if mode > 15 {
                return Err(GraphError::InvalidMode(mode));
            }
        }
        if let Some(expected) = kind.arity() {
            if inputs.len() != expected {
                return Err(GraphError::ArityMismatch {
                    kind: kind.name(),
                    expected,
                    actual: inputs.len(),
                });
            }
        }
        Ok(self.push(GateNode::new(kind, inputs.to_vec())))
    }

    /// Adds a NOT gate.
    pub fn not(&self, x: GateId) -> GateId {
        self.push(GateNode::new(GateKind::Not, vec![x]))
    }

    /// Adds an identity (buffer) gate.
    pub fn ident(&self, x: GateId) -> GateId {
        self.push(GateNode::new(GateKind::Ident, vec![x]))
    }

    /// Adds an AND gate.
    pub fn and(&self, x: GateId, y: GateId) -> GateId {
        self.push(GateNode::new(GateKind::And, vec![x, y]))
    }

    /// Adds an OR gate.
    pub fn or(&self, x: GateId, y: GateId) -> GateId {
        self.push(GateNode::new(GateKind::Or, vec![x, y]))
    }

    /// Adds a NAND gate.
    pub fn nand(&self, x: GateId, y: GateId) -> GateId {
        self.push(GateNode::new(GateKind::Nand, vec![x, y]))
    }

    /// Adds a NOR gate.
    pub fn nor(&self, x: GateId, y: GateId) -> GateId {
        self.push(GateNode::new(GateKind::Nor, vec![x, y]))
    }

    /// Adds an XOR gate.
    pub fn xor(&self, x: GateId, y: GateId) -> GateId {
        self.push(GateNode::new(GateKind::Xor, vec![x, y]))
    }

    /// Adds an XNOR gate.
    pub fn xnor(&self, x: GateId, y: GateId) -> GateId {
        self.push(GateNode::new(GateKind::Xnor, vec![x, y]))
    }

    /// Adds an implication gate, `!x | y`.
    pub fn imply(&self, x: GateId, y: GateId) -> GateId {
        self.push(GateNode::new(GateKind::Imply, vec![x, y]))
    }

    /// Adds a generic 2-input gate with the given 4-bit truth table mode.
    ///
    /// Bit `x + 2y` of `mode` is the output for the input pair `(x, y)`.
    pub fn custom(&self, mode: u8, x: GateId, y: GateId) -> Result<GateId, GraphError> {
        if mode > 15 {
            return Err(GraphError::InvalidMode(mode));
        }
        Ok(self.push(GateNode::new(GateKind::Custom(mode), vec![x, y])))
    }

    /// Adds an AND gate over any number of inputs. True when empty.
    pub fn multi_and(&self, inputs: &[GateId]) -> GateId {
        self.push(GateNode::new(GateKind::MultiAnd, inputs.to_vec()))
    }

    /// Adds an OR gate over any number of inputs. False when empty.
    pub fn multi_or(&self, inputs: &[GateId]) -> GateId {
        self.push(GateNode::new(GateKind::MultiOr, inputs.to_vec()))
    }

    /// Sets the state of an input gate.
    ///
    /// The new state takes effect on the next evaluation pass; caches filled
    /// under earlier tokens are stale by construction and never returned.
    pub fn set_input(&self, id: GateId, state: bool) -> Result<(), GraphError> {
        let nodes = self.nodes.borrow();
        let node = &nodes[id.0];
        if node.kind != GateKind::Input {
            return Err(GraphError::NotAnInput(id));
        }
        node.state.set(state);
        Ok(())
    }

    /// Sets input state without checking the kind. Callers must have
    /// validated that `id` is an input gate.
    pub(crate) fn set_state(&self, id: GateId, state: bool) {
        self.nodes.borrow()[id.0].state.set(state);
    }

    /// Mints a fresh evaluation pass token.
    pub fn begin_pass(&self) -> PassToken {
        let token = self.pass.get() + 1;
        self.pass.set(token);
        trace!(pass = token, "begin evaluation pass");
        PassToken(token)
    }

    /// Evaluates the gate under a fresh pass token.
    ///
    /// Memoization applies only within this call's own recursive fan-out:
    /// repeated calls recompute everything beneath the gate, so the result
    /// always reflects the current input states.
    pub fn value(&self, id: GateId) -> bool {
        let token = self.begin_pass();
        self.value_in(id, token)
    }

    /// Evaluates the gate under the given pass token.
    ///
    /// If the gate was already computed under this token its cached value is
    /// returned without touching its inputs. Otherwise its inputs are
    /// resolved recursively, in declared order, the kind's function is
    /// applied to the resulting values and the result is cached under the
    /// token.
    pub fn value_in(&self, id: GateId, token: PassToken) -> bool {
        let nodes = self.nodes.borrow();
        Self::eval(&nodes, id, token)
    }

    fn eval(nodes: &[GateNode], id: GateId, token: PassToken) -> bool {
        let node = &nodes[id.0];
        if node.last_pass.get() == token.0 {
            return node.cached.get();
        }

        let value = if node.kind == GateKind::Input {
            node.state.get()
        } else {
            let values: Vec<bool> = node
                .inputs
                .iter()
                .map(|&input| Self::eval(nodes, input, token))
                .collect();
            node.kind.apply(&values)
        };

        node.evals.set(node.evals.get() + 1);
        node.last_pass.set(token.0);
        node.cached.set(value);
        value
    }
}

impl fmt::Debug for GateGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateGraph")
            .field("gates", &self.len())
            .field("pass", &self.pass.get())
            .finish()
    }
}
