use std::fmt::Display;

/// The kind of a logic gate.
///
/// This is the closed vocabulary of combinational behaviors a gate node can
/// have. Every kind is a pure function of its ordered input values, except
/// [`Input`](GateKind::Input) whose value is externally set state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateKind {
    /// Externally settable input.
    Input,
    /// Constant true or false.
    Const(bool),
    /// Inverter gate.
    Not,
    /// Identity (buffer) gate.
    Ident,
    /// AND gate.
    And,
    /// OR gate.
    Or,
    /// NAND gate.
    Nand,
    /// NOR gate.
    Nor,
    /// XOR gate.
    Xor,
    /// XNOR gate.
    Xnor,
    /// Implication gate, `!a | b`.
    Imply,
    /// Generic 2-input gate defined by a 4-bit truth table.
    ///
    /// Bit `a + 2b` of the mode is the output for the input pair `(a, b)`,
    /// so the first input contributes the low-order index bit. Mode 1 is
    /// AND, 6 is XOR, 14 is NAND.
    Custom(u8),
    /// AND over any number of inputs. True when empty.
    MultiAnd,
    /// OR over any number of inputs. False when empty.
    MultiOr,
}

impl GateKind {
    /// Returns the fixed arity of the kind, or `None` for the multi-input
    /// kinds whose arity is set by the inputs supplied at construction.
    pub fn arity(&self) -> Option<usize> {
        match self {
            GateKind::Input | GateKind::Const(_) => Some(0),
            GateKind::Not | GateKind::Ident => Some(1),
            GateKind::And
            | GateKind::Or
            | GateKind::Nand
            | GateKind::Nor
            | GateKind::Xor
            | GateKind::Xnor
            | GateKind::Imply
            | GateKind::Custom(_) => Some(2),
            GateKind::MultiAnd | GateKind::MultiOr => None,
        }
    }

    /// Returns the display name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Input => "Input",
            GateKind::Const(true) => "TRUE",
            GateKind::Const(false) => "FALSE",
            GateKind::Not => "NOT",
            GateKind::Ident => "IDENT",
            GateKind::And | GateKind::MultiAnd => "AND",
            GateKind::Or | GateKind::MultiOr => "OR",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
            GateKind::Imply => "IMPLY",
            GateKind::Custom(_) => "CUSTOM",
        }
    }

    /// Applies the kind's combinational function to the ordered input values.
    ///
    /// `Input` gates carry state instead of a function and are resolved by
    /// the graph before this is reached.
    pub(crate) fn apply(&self, values: &[bool]) -> bool {
        match *self {
            GateKind::Input => unreachable!("input gates are resolved from state"),
            GateKind::Const(value) => value,
            GateKind::Not => !values[0],
            GateKind::Ident => values[0],
            GateKind::And => values[0] & values[1],
            GateKind::Or => values[0] | values[1],
            GateKind::Nand => !(values[0] & values[1]),
            GateKind::Nor => !(values[0] | values[1]),
            GateKind::Xor => values[0] ^ values[1],
            GateKind::Xnor => !(values[0] ^ values[1]),
            GateKind::Imply => !values[0] | values[1],
            GateKind::Custom(mode) => {
                let index = values[0] as u8 + 2 * (values[1] as u8);
                (mode >> index) & 1 == 1
            }
            GateKind::MultiAnd => values.iter().all(|&v| v),
            GateKind::MultiOr => values.iter().any(|&v| v),
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The id of a gate node within a [`GateGraph`](crate::GateGraph).
///
/// Ids are only meaningful for the graph that created them. A gate is shared
/// (fanned out) by using its id as an input to more than one other gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateId(pub(crate) usize);

impl GateId {
    /// Returns the index of the gate in its graph.
    pub fn id(&self) -> usize {
        self.0
    }
}

impl Display for GateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gate({})", self.0)
    }
}

/// An evaluation pass token.
///
/// One token corresponds to one logical run over a graph: a node's cached
/// value is reused exactly when it was computed under the token of the
/// current request, so shared nodes are computed once per pass. Tokens are
/// minted from a per-graph generation counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassToken(pub(crate) u64);
