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

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::bit::{Clbit, Qubit};
use crate::error::{CircuitError, CircuitResult};
use crate::operations::{Gate, Operation};
use crate::param_expression::ParameterExpression;

/// A single gate instance placed on a fixed ordered set of qubit/clbit
/// wires. One node of a [`Circuit`]'s instruction list, or (once imported
/// into a [`crate::dag_circuit::CircuitDag`]) one op-node of the DAG.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub gate: Gate,
    pub qubits: SmallVec<[Qubit; 4]>,
    pub clbits: SmallVec<[Clbit; 2]>,
}

impl Instruction {
    pub fn new(gate: Gate, qubits: impl Into<SmallVec<[Qubit; 4]>>, clbits: impl Into<SmallVec<[Clbit; 2]>>) -> Self {
        Instruction {
            gate,
            qubits: qubits.into(),
            clbits: clbits.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.gate.name()
    }
}

/// The sequential representation of a circuit: an ordered instruction list
/// over a fixed number of qubit and clbit wires. Must round-trip losslessly
/// with [`crate::dag_circuit::CircuitDag`].
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    pub num_qubits: u32,
    pub num_clbits: u32,
    pub data: Vec<Instruction>,
    pub global_phase: ParameterExpression,
}

impl Circuit {
    pub fn new(num_qubits: u32, num_clbits: u32) -> Self {
        Circuit {
            num_qubits,
            num_clbits,
            data: Vec::new(),
            global_phase: ParameterExpression::constant(0.0),
        }
    }

    /// Append a gate instance, validating arity and wire bounds up front so
    /// every op-node ends up with exactly one edge per wire it touches once
    /// converted into a DAG, rather than deferring the check to conversion
    /// time.
    pub fn apply(
        &mut self,
        gate: Gate,
        qubits: impl Into<SmallVec<[Qubit; 4]>>,
        clbits: impl Into<SmallVec<[Clbit; 2]>>,
    ) -> CircuitResult<()> {
        let qubits = qubits.into();
        let clbits = clbits.into();
        if qubits.len() as u32 != gate.num_qubits() {
            return Err(CircuitError::QubitCountMismatch {
                name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len() as u32,
            });
        }
        for &q in &qubits {
            if q.0 >= self.num_qubits {
                return Err(CircuitError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
        }
        for &c in &clbits {
            if c.0 >= self.num_clbits {
                return Err(CircuitError::ClbitOutOfRange {
                    clbit: c,
                    num_clbits: self.num_clbits,
                });
            }
        }
        let mut seen = SmallVec::<[Qubit; 4]>::new();
        for &q in &qubits {
            if seen.contains(&q) {
                return Err(CircuitError::DuplicateQubit {
                    qubit: q,
                    name: gate.name().to_string(),
                });
            }
            seen.push(q);
        }
        self.data.push(Instruction::new(gate, qubits, clbits));
        Ok(())
    }

    /// Distinct gate names appearing in this circuit — the planner's
    /// `source_basis` for a circuit read straight off a DAG's op-nodes.
    pub fn op_names(&self) -> std::collections::HashSet<String> {
        self.data.iter().map(|inst| inst.name().to_string()).collect()
    }

    /// Per-name instruction counts, used by the planner to compute a
    /// template's contribution to a neighbor basis state and by
    /// end-to-end tests to assert expected op-counts.
    pub fn count_ops(&self) -> IndexMap<String, usize> {
        let mut counts = IndexMap::new();
        for inst in &self.data {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{CustomGate, GateOperation, StandardGate};
    use smallvec::smallvec;

    #[test]
    fn apply_rejects_arity_mismatch() {
        let mut circuit = Circuit::new(2, 0);
        let result = circuit.apply(
            Gate::standard(StandardGate::CX, SmallVec::new()),
            smallvec![Qubit(0)],
            SmallVec::new(),
        );
        assert!(matches!(result, Err(CircuitError::QubitCountMismatch { .. })));
    }

    #[test]
    fn apply_rejects_duplicate_qubit() {
        let mut circuit = Circuit::new(2, 0);
        let result = circuit.apply(
            Gate::standard(StandardGate::CX, SmallVec::new()),
            smallvec![Qubit(0), Qubit(0)],
            SmallVec::new(),
        );
        assert!(matches!(result, Err(CircuitError::DuplicateQubit { .. })));
    }

    #[test]
    fn count_ops_tracks_names() {
        let mut circuit = Circuit::new(2, 0);
        circuit
            .apply(Gate::standard(StandardGate::CX, SmallVec::new()), smallvec![Qubit(0), Qubit(1)], SmallVec::new())
            .unwrap();
        circuit
            .apply(Gate::standard(StandardGate::CX, SmallVec::new()), smallvec![Qubit(1), Qubit(0)], SmallVec::new())
            .unwrap();
        circuit
            .apply(Gate::custom(CustomGate::new("z2", 1, 0), SmallVec::new()), smallvec![Qubit(0)], SmallVec::new())
            .unwrap();
        let counts = circuit.count_ops();
        assert_eq!(counts["cx"], 2);
        assert_eq!(counts["z2"], 1);
    }

    #[test]
    fn op_names_is_distinct_set() {
        let mut circuit = Circuit::new(1, 0);
        circuit
            .apply(Gate::standard(StandardGate::H, SmallVec::new()), smallvec![Qubit(0)], SmallVec::new())
            .unwrap();
        circuit
            .apply(Gate::standard(StandardGate::H, SmallVec::new()), smallvec![Qubit(0)], SmallVec::new())
            .unwrap();
        let names = circuit.op_names();
        assert_eq!(names.len(), 1);
        assert!(names.contains("h"));
        let _ = GateOperation::Standard(StandardGate::H);
    }
}
