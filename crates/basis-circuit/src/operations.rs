// This code is part of Qiskit.
//
// (C) Copyright IBM 2024
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

use num_complex::Complex64;
use ndarray::Array2;
use smallvec::SmallVec;

use crate::circuit_data::Circuit;
use crate::gate_matrix;
use crate::param_expression::Param;

/// Names that are never rewritten by the basis translator: they have no
/// unitary and so cannot participate in an equivalence.
pub const IRREDUCIBLE_NAMES: [&str; 4] = ["measure", "reset", "barrier", "snapshot"];

/// Common capability set every gate-like operation exposes to the circuit
/// data model and the translator. Standard library gates and user-defined
/// custom gates share one `append(op, qargs, cargs)` path on `Circuit`
/// rather than each gaining a bespoke append method.
pub trait Operation {
    fn name(&self) -> &str;
    fn num_qubits(&self) -> u32;
    fn num_clbits(&self) -> u32;
    fn num_params(&self) -> u32;
}

/// The fixed catalog of gates the translator knows how to draw matrices and
/// default arities for without consulting a definition. Arity and
/// parameter-count tables below are the authority the planner's
/// `arities_for`/library lookups are built on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardGate {
    I,
    H,
    X,
    Y,
    Z,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    SXdg,
    P,
    U1,
    U2,
    U3,
    RX,
    RY,
    RZ,
    CX,
    CY,
    CZ,
    Swap,
    ECR,
    CCX,
    GlobalPhase,
}

impl StandardGate {
    pub const ALL: [StandardGate; 25] = [
        StandardGate::I,
        StandardGate::H,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::S,
        StandardGate::Sdg,
        StandardGate::T,
        StandardGate::Tdg,
        StandardGate::SX,
        StandardGate::SXdg,
        StandardGate::P,
        StandardGate::U1,
        StandardGate::U2,
        StandardGate::U3,
        StandardGate::RX,
        StandardGate::RY,
        StandardGate::RZ,
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::Swap,
        StandardGate::ECR,
        StandardGate::CCX,
        StandardGate::GlobalPhase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::P => "p",
            StandardGate::U1 => "u1",
            StandardGate::U2 => "u2",
            StandardGate::U3 => "u3",
            StandardGate::RX => "rx",
            StandardGate::RY => "ry",
            StandardGate::RZ => "rz",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::ECR => "ecr",
            StandardGate::CCX => "ccx",
            StandardGate::GlobalPhase => "global_phase",
        }
    }

    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::GlobalPhase => 0,
            StandardGate::I
            | StandardGate::H
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::P
            | StandardGate::U1
            | StandardGate::U2
            | StandardGate::U3
            | StandardGate::RX
            | StandardGate::RY
            | StandardGate::RZ => 1,
            StandardGate::CX | StandardGate::CY | StandardGate::CZ | StandardGate::Swap | StandardGate::ECR => 2,
            StandardGate::CCX => 3,
        }
    }

    pub fn num_params(&self) -> u32 {
        match self {
            StandardGate::RX | StandardGate::RY | StandardGate::RZ | StandardGate::P | StandardGate::U1
            | StandardGate::GlobalPhase => 1,
            StandardGate::U2 => 2,
            StandardGate::U3 => 3,
            _ => 0,
        }
    }

    /// The gate's matrix for a fully-bound parameter vector; `None` if any
    /// parameter is still symbolic (callers should bind first).
    pub fn matrix(&self, params: &[Param]) -> Option<Array2<Complex64>> {
        let f = |i: usize| params.get(i).and_then(Param::as_f64);
        match self {
            StandardGate::I => Some(gate_matrix::one_qubit_identity()),
            StandardGate::H => Some(gate_matrix::h_gate()),
            StandardGate::X => Some(gate_matrix::x_gate()),
            StandardGate::Y => Some(gate_matrix::y_gate()),
            StandardGate::Z => Some(gate_matrix::z_gate()),
            StandardGate::S => Some(gate_matrix::p_gate(std::f64::consts::FRAC_PI_2)),
            StandardGate::Sdg => Some(gate_matrix::p_gate(-std::f64::consts::FRAC_PI_2)),
            StandardGate::T => Some(gate_matrix::p_gate(std::f64::consts::FRAC_PI_4)),
            StandardGate::Tdg => Some(gate_matrix::p_gate(-std::f64::consts::FRAC_PI_4)),
            StandardGate::SX => Some(gate_matrix::sx_gate()),
            StandardGate::SXdg => Some(gate_matrix::sx_gate().mapv(|c| c.conj())),
            StandardGate::P => Some(gate_matrix::p_gate(f(0)?)),
            StandardGate::U1 => Some(gate_matrix::p_gate(f(0)?)),
            StandardGate::U2 => Some(gate_matrix::u3_gate(std::f64::consts::FRAC_PI_2, f(0)?, f(1)?)),
            StandardGate::U3 => Some(gate_matrix::u3_gate(f(0)?, f(1)?, f(2)?)),
            StandardGate::RX => Some(gate_matrix::rx_gate(f(0)?)),
            StandardGate::RY => Some(gate_matrix::ry_gate(f(0)?)),
            StandardGate::RZ => Some(gate_matrix::rz_gate(f(0)?)),
            StandardGate::CX => Some(gate_matrix::cx_gate()),
            StandardGate::CY => Some(gate_matrix::cy_gate()),
            StandardGate::CZ => Some(gate_matrix::cz_gate()),
            StandardGate::Swap => Some(gate_matrix::swap_gate()),
            StandardGate::ECR => Some(gate_matrix::ecr_gate()),
            StandardGate::CCX => Some(gate_matrix::ccx_gate()),
            StandardGate::GlobalPhase => Some(gate_matrix::global_phase_gate(f(0)?)),
        }
    }
}

/// A gate whose shape (name, arity, parameter count, optional definition or
/// matrix) is not part of the standard catalog: either a user-supplied gate
/// registered with its own equivalence, or one of the irreducible built-ins
/// (`measure`/`reset`/`barrier`/`snapshot`), which carry no matrix at all.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomGate {
    pub name: String,
    pub num_qubits: u32,
    pub num_clbits: u32,
    pub num_params: u32,
    pub definition: Option<Circuit>,
    pub matrix: Option<Array2<Complex64>>,
}

impl CustomGate {
    pub fn new(name: impl Into<String>, num_qubits: u32, num_params: u32) -> Self {
        CustomGate {
            name: name.into(),
            num_qubits,
            num_clbits: 0,
            num_params,
            definition: None,
            matrix: None,
        }
    }

    pub fn with_definition(mut self, definition: Circuit) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn with_matrix(mut self, matrix: Array2<Complex64>) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn with_clbits(mut self, num_clbits: u32) -> Self {
        self.num_clbits = num_clbits;
        self
    }

    pub fn measure() -> Self {
        CustomGate::new("measure", 1, 0).with_clbits(1)
    }

    pub fn reset() -> Self {
        CustomGate::new("reset", 1, 0)
    }

    pub fn barrier(num_qubits: u32) -> Self {
        CustomGate::new("barrier", num_qubits, 0)
    }

    pub fn snapshot(num_qubits: u32) -> Self {
        CustomGate::new("snapshot", num_qubits, 0)
    }
}

/// A gate instance: either drawn from the standard catalog or a custom/
/// irreducible gate, paired with its bound (or still-symbolic) parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum GateOperation {
    Standard(StandardGate),
    Custom(CustomGate),
}

impl Operation for GateOperation {
    fn name(&self) -> &str {
        match self {
            GateOperation::Standard(g) => g.name(),
            GateOperation::Custom(g) => &g.name,
        }
    }

    fn num_qubits(&self) -> u32 {
        match self {
            GateOperation::Standard(g) => g.num_qubits(),
            GateOperation::Custom(g) => g.num_qubits,
        }
    }

    fn num_clbits(&self) -> u32 {
        match self {
            GateOperation::Standard(_) => 0,
            GateOperation::Custom(g) => g.num_clbits,
        }
    }

    fn num_params(&self) -> u32 {
        match self {
            GateOperation::Standard(g) => g.num_params(),
            GateOperation::Custom(g) => g.num_params,
        }
    }
}

impl GateOperation {
    /// The gate's own definition in terms of other operations, if it has
    /// one. Used by the definition-fallback synthesizer when the
    /// equivalence library has no entry for this gate.
    pub fn definition(&self) -> Option<&Circuit> {
        match self {
            GateOperation::Standard(_) => None,
            GateOperation::Custom(g) => g.definition.as_ref(),
        }
    }

    pub fn matrix(&self, params: &[Param]) -> Option<Array2<Complex64>> {
        match self {
            GateOperation::Standard(g) => g.matrix(params),
            GateOperation::Custom(g) => g.matrix.clone(),
        }
    }
}

/// A gate plus its bound parameter list: the unit the equivalence library
/// keys on `(name, arity)` and the unit equivalences are defined over.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    pub op: GateOperation,
    pub params: SmallVec<[Param; 3]>,
}

impl Gate {
    pub fn new(op: GateOperation, params: impl Into<SmallVec<[Param; 3]>>) -> Self {
        Gate {
            op,
            params: params.into(),
        }
    }

    pub fn standard(gate: StandardGate, params: impl Into<SmallVec<[Param; 3]>>) -> Self {
        Gate::new(GateOperation::Standard(gate), params)
    }

    pub fn custom(gate: CustomGate, params: impl Into<SmallVec<[Param; 3]>>) -> Self {
        Gate::new(GateOperation::Custom(gate), params)
    }

    pub fn name(&self) -> &str {
        self.op.name()
    }

    pub fn arity(&self) -> u32 {
        self.op.num_qubits()
    }

    pub fn copy(&self) -> Gate {
        self.clone()
    }
}

impl Operation for Gate {
    fn name(&self) -> &str {
        self.op.name()
    }

    fn num_qubits(&self) -> u32 {
        self.op.num_qubits()
    }

    fn num_clbits(&self) -> u32 {
        self.op.num_clbits()
    }

    fn num_params(&self) -> u32 {
        self.op.num_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_gate_arity_table_matches_names() {
        assert_eq!(StandardGate::CX.name(), "cx");
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::U3.num_params(), 3);
    }

    #[test]
    fn irreducible_names_have_no_definition() {
        let measure = Gate::custom(CustomGate::measure(), SmallVec::new());
        assert_eq!(measure.name(), "measure");
        assert!(measure.op.definition().is_none());
        assert!(IRREDUCIBLE_NAMES.contains(&measure.name()));
    }
}
