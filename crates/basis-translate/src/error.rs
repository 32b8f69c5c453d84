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

use std::collections::BTreeSet;

use thiserror::Error;

/// Errors raised by the equivalence library, the basis planner, the
/// transform composer, and the translator driver.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TranslateError {
    #[error("no path from source basis {source:?} to target basis {target:?}")]
    BasisUnreachable {
        source: BTreeSet<String>,
        target: BTreeSet<String>,
    },

    #[error("equivalence template for '{name}' has arity {template_arity}, but the gate has arity {gate_arity}")]
    ArityMismatch {
        name: String,
        gate_arity: u32,
        template_arity: u32,
    },

    #[error("equivalence template for '{name}' references formal parameter '{symbol}', which is not one of the gate's own formal parameters")]
    FreeParameter { name: String, symbol: String },

    #[error("binding '{name}' expected {expected} parameter(s), got {got}")]
    ParamCountMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("applier produced a node named '{0}' that is neither in the target basis nor covered by the plan")]
    UnmappedGate(String),

    #[error("search exhausted its iteration budget of {0} expansions without reaching the target basis")]
    BudgetExceeded(usize),

    #[error("the equivalence library was already seeded with a base rule set")]
    AlreadyInitialized,

    #[error(
        "circuit data model error: {0}"
    )]
    Circuit(#[from] basis_circuit::CircuitError),
}

pub type TranslateResult<T> = Result<T, TranslateError>;

/// `DefinitionMissing` is deliberately not a `TranslateError` variant: it is
/// a pass-through diagnostic the synthesizer reports to its caller via a
/// side channel, not a hard failure of `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionMissing(pub String);
