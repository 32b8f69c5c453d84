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

//! The translator driver: glues the planner, composer, and applier together
//! into the caller-visible `run(dag) -> dag` entry point.

use std::collections::{HashMap, HashSet};

use basis_circuit::{CircuitDag, Gate, Operation, IRREDUCIBLE_NAMES};

use crate::basis_search::basis_search;
use crate::compose_transforms::{bind_replacement, compose_transforms};
use crate::equivalence::EquivalenceLibrary;
use crate::error::{TranslateError, TranslateResult};

/// `BasisTranslator(library, target_basis)` — rewrites a `CircuitDag` so
/// every op-node is drawn from `target_basis ∪ irreducibles`.
pub struct BasisTranslator<'a> {
    library: &'a EquivalenceLibrary,
    target_basis: HashSet<String>,
    budget: Option<usize>,
}

impl<'a> BasisTranslator<'a> {
    pub fn new(library: &'a EquivalenceLibrary, target_basis: impl IntoIterator<Item = String>) -> Self {
        BasisTranslator {
            library,
            target_basis: target_basis.into_iter().collect(),
            budget: None,
        }
    }

    /// Bound the planner's search to at most `budget` state expansions.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    fn target_with_irreducibles(&self) -> HashSet<String> {
        let mut target = self.target_basis.clone();
        target.extend(IRREDUCIBLE_NAMES.iter().map(|s| s.to_string()));
        target
    }

    #[tracing::instrument(skip(self, dag))]
    pub fn run(&self, dag: &CircuitDag) -> TranslateResult<CircuitDag> {
        let op_nodes = dag.op_nodes();
        let mut source_basis = HashSet::new();
        let mut example_gates: HashMap<String, Gate> = HashMap::new();
        for &node in &op_nodes {
            let inst = dag.instruction(node).map_err(TranslateError::from)?;
            source_basis.insert(inst.name().to_string());
            example_gates.entry(inst.name().to_string()).or_insert_with(|| inst.gate.clone());
        }

        let target = self.target_with_irreducibles();
        tracing::debug!(source = ?source_basis, target = ?target, "computed source/target basis");

        let plan = basis_search(self.library, &source_basis, &target, self.budget)?;
        tracing::debug!(plan_len = plan.len(), "planner produced rewrite plan");

        let mapped_ops = compose_transforms(&plan, &source_basis, &example_gates)?;

        let mut output = dag.clone();
        for node in output.topological_op_nodes().map_err(TranslateError::from)? {
            let (name, actual_params, arity) = {
                let inst = output.instruction(node).map_err(TranslateError::from)?;
                (inst.name().to_string(), inst.gate.params.clone(), inst.gate.num_qubits())
            };
            if target.contains(&name) {
                continue;
            }
            let (formal_params, template_dag) = mapped_ops
                .get(&name)
                .ok_or_else(|| TranslateError::UnmappedGate(name.clone()))?;
            let bound = bind_replacement(formal_params, &actual_params, template_dag)?;

            if bound.data.len() == 1 && bound.data[0].qubits.len() as u32 == arity && bound.data[0].clbits.is_empty() {
                output
                    .substitute_node(node, bound.data[0].gate.clone())
                    .map_err(TranslateError::from)?;
            } else {
                output
                    .substitute_node_with_dag(node, &bound)
                    .map_err(TranslateError::from)?;
            }
            tracing::trace!(gate = %name, "substituted node");
        }

        Ok(output)
    }
}
