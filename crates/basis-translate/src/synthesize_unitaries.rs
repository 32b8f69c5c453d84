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

//! Definition-fallback synthesis: resolve op-nodes the equivalence library
//! has no entry for by recursively unrolling the gate's own `definition`.

use std::collections::HashSet;

use basis_circuit::{Circuit, CircuitDag, Operation};

use crate::equivalence::EquivalenceLibrary;
use crate::error::{DefinitionMissing, TranslateError, TranslateResult};

/// Bounded repeated definition-expansion down to `{u3, cx}` — the minimal
/// basis the fallback path always targets, mirroring the `Unroller`
/// collaborator the synthesizer hands its local DAG to.
const UNROLL_TARGET: [&str; 2] = ["u3", "cx"];

fn unroll_to_minimal_basis(circuit: &Circuit, iteration_budget: usize) -> TranslateResult<Circuit> {
    let target: HashSet<&str> = UNROLL_TARGET.into_iter().collect();
    let mut current = circuit.clone();
    for _ in 0..iteration_budget {
        if current.op_names().iter().all(|name| target.contains(name.as_str())) {
            return Ok(current);
        }
        let mut dag = CircuitDag::from_circuit(&current).map_err(TranslateError::from)?;
        let mut changed = false;
        for node in dag.op_nodes() {
            let inst = dag.instruction(node).map_err(TranslateError::from)?;
            if target.contains(inst.name()) {
                continue;
            }
            if let Some(def) = inst.gate.op.definition().cloned() {
                dag.substitute_node_with_dag(node, &def).map_err(TranslateError::from)?;
                changed = true;
            }
        }
        current = dag.to_circuit().map_err(TranslateError::from)?;
        if !changed {
            return Ok(current);
        }
    }
    Ok(current)
}

/// `SynthesizeUnitaries(library)` — the caller-visible wrapper around
/// [`synthesize_unitaries`] matching the Planner/Composer/Translator's own
/// `(library).run(dag) -> dag` shape.
pub struct SynthesizeUnitaries<'a> {
    library: &'a EquivalenceLibrary,
}

impl<'a> SynthesizeUnitaries<'a> {
    pub fn new(library: &'a EquivalenceLibrary) -> Self {
        SynthesizeUnitaries { library }
    }

    /// Run definition-fallback synthesis over a copy of `dag`, returning the
    /// rewritten DAG and any gates that had neither a library entry nor a
    /// definition to fall back on.
    pub fn run(&self, dag: &CircuitDag) -> TranslateResult<(CircuitDag, Vec<DefinitionMissing>)> {
        let mut output = dag.clone();
        let mut missing = Vec::new();
        synthesize_unitaries(self.library, &mut output, &mut missing)?;
        Ok((output, missing))
    }
}

/// Walk every op-node of `dag`; for any whose gate has no equivalence-library
/// entry, substitute its own `definition` (recursively unrolled to
/// `{u3, cx}`). Nodes with neither a library entry nor a definition are left
/// untouched, and their name is appended to `missing` as a pass-through
/// diagnostic rather than a hard error.
#[tracing::instrument(skip(lib, dag, missing))]
pub fn synthesize_unitaries(
    lib: &EquivalenceLibrary,
    dag: &mut CircuitDag,
    missing: &mut Vec<DefinitionMissing>,
) -> TranslateResult<()> {
    for node in dag.op_nodes() {
        let (name, has_definition, definition) = {
            let inst = dag.instruction(node).map_err(TranslateError::from)?;
            let has_entry = lib.has_entry(&inst.gate);
            if has_entry {
                continue;
            }
            (
                inst.name().to_string(),
                inst.gate.op.definition().is_some(),
                inst.gate.op.definition().cloned(),
            )
        };
        if !has_definition {
            missing.push(DefinitionMissing(name));
            continue;
        }
        let definition = definition.expect("checked has_definition above");
        let unrolled = unroll_to_minimal_basis(&definition, 64)?;
        dag.substitute_node_with_dag(node, &unrolled).map_err(TranslateError::from)?;
        tracing::trace!(gate = %name, "synthesized node via definition fallback");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use basis_circuit::{CustomGate, Gate, Qubit, StandardGate};
    use smallvec::smallvec;

    #[test]
    fn gate_with_entry_is_left_alone() {
        let mut lib = EquivalenceLibrary::new();
        let testgate = Gate::custom(CustomGate::new("testgate", 1, 0), smallvec![]);
        lib.add(&testgate, vec![], Circuit::new(1, 0)).unwrap();

        let mut circuit = Circuit::new(1, 0);
        circuit.apply(testgate, vec![Qubit(0)], vec![]).unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        let mut missing = Vec::new();
        synthesize_unitaries(&lib, &mut dag, &mut missing).unwrap();
        assert!(missing.is_empty());
        assert_eq!(dag.to_circuit().unwrap().count_ops()["testgate"], 1);
    }

    #[test]
    fn gate_without_entry_or_definition_is_reported_missing() {
        let lib = EquivalenceLibrary::new();
        let lonely = Gate::custom(CustomGate::new("lonely", 1, 0), smallvec![]);
        let mut circuit = Circuit::new(1, 0);
        circuit.apply(lonely, vec![Qubit(0)], vec![]).unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        let mut missing = Vec::new();
        synthesize_unitaries(&lib, &mut dag, &mut missing).unwrap();
        assert_eq!(missing, vec![DefinitionMissing("lonely".to_string())]);
    }

    #[test]
    fn gate_with_definition_is_unrolled() {
        let lib = EquivalenceLibrary::new();
        let mut definition = Circuit::new(1, 0);
        definition.apply(Gate::standard(StandardGate::U3, smallvec![
            basis_circuit::Param::Float(0.0),
            basis_circuit::Param::Float(0.0),
            basis_circuit::Param::Float(std::f64::consts::PI),
        ]), vec![Qubit(0)], vec![]).unwrap();
        let custom = basis_circuit::CustomGate::new("myx", 1, 0).with_definition(definition);
        let gate = Gate::custom(custom, smallvec![]);

        let mut circuit = Circuit::new(1, 0);
        circuit.apply(gate, vec![Qubit(0)], vec![]).unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        let mut missing = Vec::new();
        synthesize_unitaries(&lib, &mut dag, &mut missing).unwrap();
        assert!(missing.is_empty());
        let counts = dag.to_circuit().unwrap().count_ops();
        assert_eq!(counts.get("u3").copied(), Some(1));
        assert!(!counts.contains_key("myx"));
    }

    #[test]
    fn wrapper_leaves_input_dag_untouched() {
        let lib = EquivalenceLibrary::new();
        let lonely = Gate::custom(CustomGate::new("lonely", 1, 0), smallvec![]);
        let mut circuit = Circuit::new(1, 0);
        circuit.apply(lonely, vec![Qubit(0)], vec![]).unwrap();
        let dag = CircuitDag::from_circuit(&circuit).unwrap();

        let (output, missing) = SynthesizeUnitaries::new(&lib).run(&dag).unwrap();
        assert_eq!(missing, vec![DefinitionMissing("lonely".to_string())]);
        assert_eq!(dag.to_circuit().unwrap().count_ops()["lonely"], 1);
        assert_eq!(output.to_circuit().unwrap().count_ops()["lonely"], 1);
    }
}
