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

//! The equivalence library: an indexed, queryable store of algebraic
//! rewrite rules keyed by `(gate_name, arity)`.

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use basis_circuit::{Circuit, Gate, Operation, ParameterExpression};

use crate::error::{TranslateError, TranslateResult};

/// One template right-hand side: the formal parameters it is built over,
/// and the circuit itself.
pub type Equivalence = (Vec<ParameterExpression>, Circuit);

/// The record stored under a `(name, arity)` key.
#[derive(Clone, Debug, Default)]
pub struct EquivalenceEntry {
    /// When `false`, this entry is consulted only for direct rewrite, never
    /// as a hop the planner may expand through.
    pub search_base: bool,
    pub equivalences: Vec<Equivalence>,
}

/// Map from `(name, arity)` to `EquivalenceEntry`. There is deliberately no
/// `label` component anywhere in the key: every lookup and insertion
/// re-derives `(name, arity)` from the `Gate` value it was just given, which
/// makes the "equivalence filed under a stale variable binding" class of bug
/// structurally unrepresentable here.
#[derive(Clone, Debug, Default)]
pub struct EquivalenceLibrary {
    entries: IndexMap<(String, u32), EquivalenceEntry>,
}

impl EquivalenceLibrary {
    pub fn new() -> Self {
        EquivalenceLibrary {
            entries: IndexMap::new(),
        }
    }

    /// Append a new equivalence for `gate`'s `(name, arity)` key.
    pub fn add(
        &mut self,
        gate: &Gate,
        formal_params: Vec<ParameterExpression>,
        template: Circuit,
    ) -> TranslateResult<()> {
        if template.num_qubits != gate.arity() {
            return Err(TranslateError::ArityMismatch {
                name: gate.name().to_string(),
                gate_arity: gate.arity(),
                template_arity: template.num_qubits,
            });
        }
        let allowed: std::collections::HashSet<&str> = formal_params
            .iter()
            .filter_map(|p| match p {
                ParameterExpression::Symbol(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        for inst in &template.data {
            for param in &inst.gate.params {
                if let basis_circuit::Param::Expr(expr) = param {
                    for symbol in expr.symbols() {
                        if !allowed.contains(symbol.as_str()) {
                            return Err(TranslateError::FreeParameter {
                                name: gate.name().to_string(),
                                symbol,
                            });
                        }
                    }
                }
            }
        }
        let key = (gate.name().to_string(), gate.arity());
        let entry = self.entries.entry(key).or_insert_with(|| EquivalenceEntry {
            search_base: true,
            equivalences: Vec::new(),
        });
        entry.equivalences.push((formal_params, template));
        Ok(())
    }

    /// Replace the entry for `(name, arity)` wholesale.
    pub fn set_entry(&mut self, name: impl Into<String>, arity: u32, equivalences: Vec<Equivalence>, search_base: bool) {
        self.entries.insert((name.into(), arity), EquivalenceEntry { search_base, equivalences });
    }

    /// Never fails: an absent key simply has no equivalences.
    pub fn get_equivalences(&self, name: &str, arity: u32) -> &[Equivalence] {
        self.entries
            .get(&(name.to_string(), arity))
            .map(|entry| entry.equivalences.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_entry(&self, gate: &Gate) -> bool {
        self.entries
            .get(&(gate.name().to_string(), gate.arity()))
            .map(|entry| !entry.equivalences.is_empty())
            .unwrap_or(false)
    }

    pub fn is_search_base(&self, name: &str, arity: u32) -> bool {
        self.entries.get(&(name.to_string(), arity)).map(|e| e.search_base).unwrap_or(true)
    }

    /// The arities the library actually holds a (possibly empty) entry for,
    /// under `name`. The planner iterates only over these rather than
    /// blindly sweeping every arity up to some fixed cap — `MAX_ARITY`
    /// survives only as a defensive upper bound used when validating a
    /// freshly-built gate's arity (see `crate::basis_search::MAX_ARITY`).
    pub fn arities_for(&self, name: &str) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().filter(move |(n, _)| n == name).map(|(_, a)| *a)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(|e| e.equivalences.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static SESSION: OnceCell<EquivalenceLibrary> = OnceCell::new();

/// One-shot seeding of the process-wide default snapshot from the static
/// catalog in [`crate::standard_equivalences`]. A second call is rejected
/// with `AlreadyInitialized` rather than silently replacing the snapshot
/// readers may already be holding.
pub fn initialize_base_session() -> TranslateResult<()> {
    SESSION
        .set(crate::standard_equivalences::build_standard_library())
        .map_err(|_| TranslateError::AlreadyInitialized)
}

/// The process-wide default library, seeded on first access if
/// [`initialize_base_session`] was never called explicitly.
pub fn session() -> &'static EquivalenceLibrary {
    SESSION.get_or_init(crate::standard_equivalences::build_standard_library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use basis_circuit::{CustomGate, Param, StandardGate};
    use smallvec::smallvec;

    fn testgate(num_params: u32) -> Gate {
        Gate::custom(CustomGate::new("testgate", 2, num_params), smallvec::SmallVec::new())
    }

    #[test]
    fn add_and_retrieve_round_trips_structurally() {
        let mut lib = EquivalenceLibrary::new();
        let mut template = Circuit::new(2, 0);
        template
            .apply(Gate::standard(StandardGate::CX, smallvec![]), vec![basis_circuit::Qubit(0), basis_circuit::Qubit(1)], vec![])
            .unwrap();
        lib.add(&testgate(0), vec![], template.clone()).unwrap();
        let retrieved = lib.get_equivalences("testgate", 2);
        assert_eq!(retrieved.len(), 1);
        assert_eq!(retrieved[0].1.data.len(), template.data.len());
        assert_eq!(retrieved[0].1.data[0].name(), "cx");
    }

    #[test]
    fn add_rejects_arity_mismatch() {
        let mut lib = EquivalenceLibrary::new();
        let template = Circuit::new(3, 0);
        let result = lib.add(&testgate(0), vec![], template);
        assert!(matches!(result, Err(TranslateError::ArityMismatch { .. })));
    }

    #[test]
    fn add_rejects_free_parameter() {
        let mut lib = EquivalenceLibrary::new();
        let mut template = Circuit::new(2, 0);
        let free = ParameterExpression::symbol("not_a_formal_param");
        template
            .apply(
                Gate::standard(StandardGate::RX, smallvec![Param::Expr(free)]),
                vec![basis_circuit::Qubit(0)],
                vec![],
            )
            .unwrap();
        let result = lib.add(&testgate(1), vec![ParameterExpression::symbol("theta")], template);
        assert!(matches!(result, Err(TranslateError::FreeParameter { .. })));
    }

    #[test]
    fn has_entry_false_for_unregistered_gate() {
        let lib = EquivalenceLibrary::new();
        assert!(!lib.has_entry(&testgate(0)));
    }

    #[test]
    fn arities_for_only_lists_registered_arities() {
        let mut lib = EquivalenceLibrary::new();
        let template = Circuit::new(2, 0);
        lib.add(&testgate(0), vec![], template).unwrap();
        let arities: Vec<u32> = lib.arities_for("testgate").collect();
        assert_eq!(arities, vec![2]);
        assert!(lib.arities_for("nonexistent").next().is_none());
    }
}
