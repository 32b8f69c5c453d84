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

use thiserror::Error;

use crate::bit::{Clbit, Qubit};

/// Errors raised while building or mutating a [`crate::circuit_data::Circuit`] or
/// [`crate::dag_circuit::CircuitDag`].
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CircuitError {
    #[error("qubit {qubit:?} is out of range for a circuit with {num_qubits} qubits")]
    QubitOutOfRange { qubit: Qubit, num_qubits: u32 },

    #[error("clbit {clbit:?} is out of range for a circuit with {num_clbits} clbits")]
    ClbitOutOfRange { clbit: Clbit, num_clbits: u32 },

    #[error(
        "gate '{name}' expects {expected} qubit(s), but {got} were given"
    )]
    QubitCountMismatch {
        name: String,
        expected: u32,
        got: u32,
    },

    #[error(
        "gate '{name}' expects {expected} parameter(s), but {got} were given"
    )]
    ParamCountMismatch {
        name: String,
        expected: u32,
        got: u32,
    },

    #[error("duplicate qubit {qubit:?} in argument list for gate '{name}'")]
    DuplicateQubit { qubit: Qubit, name: String },

    #[error("node {0:?} is not present in this DAG")]
    NodeNotFound(String),

    #[error("DAG integrity check failed: {0}")]
    InvalidDag(String),

    #[error("unbound formal parameter '{0}' in a parameter expression")]
    UnboundParameter(String),
}

pub type CircuitResult<T> = Result<T, CircuitError>;
