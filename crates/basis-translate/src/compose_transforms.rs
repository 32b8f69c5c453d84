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

//! The transform composer: turns a plan into one replacement DAG per
//! source-basis gate name.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use basis_circuit::{Circuit, CircuitDag, Gate, Operation, Param, ParameterExpression, ParameterVector, Qubit};

use crate::basis_search::BasisTransform;
use crate::error::{TranslateError, TranslateResult};

/// `gate_name -> (formal_params, replacement_dag)`: the Applier looks a
/// source gate's name up here, binds the formal parameters to the node's
/// actual parameters, and substitutes.
pub type InstructionMap = IndexMap<String, (Vec<ParameterExpression>, CircuitDag)>;

fn bind_template(
    formal_params: &[ParameterExpression],
    actual_params: &[Param],
    template: &Circuit,
) -> TranslateResult<Circuit> {
    if formal_params.len() != actual_params.len() {
        return Err(TranslateError::ParamCountMismatch {
            name: "compose_transforms".to_string(),
            expected: formal_params.len(),
            got: actual_params.len(),
        });
    }
    let mut bound = template.clone();
    for inst in &mut bound.data {
        for param in &mut inst.gate.params {
            if let Param::Expr(expr) = param {
                let mut next = expr.clone();
                for (formal, actual) in formal_params.iter().zip(actual_params.iter()) {
                    if let ParameterExpression::Symbol(name) = formal {
                        next = actual.bind_into(name, &next);
                    }
                }
                *param = Param::Expr(next);
            }
        }
    }
    Ok(bound)
}

/// Build a placeholder DAG for `gate_name`/`arity` applying a gate with
/// `num_params` fresh formal parameters, ready for repeated in-place
/// substitution as the plan is walked.
fn placeholder_dag(gate: &Gate) -> TranslateResult<(Vec<ParameterExpression>, CircuitDag)> {
    let formal = ParameterVector::new(format!("{}_compose", gate.name()), gate.num_params());
    let mut circuit = Circuit::new(gate.arity(), gate.num_clbits());
    let qubits: Vec<Qubit> = (0..gate.arity()).map(Qubit).collect();
    let clbits: Vec<basis_circuit::Clbit> = (0..gate.num_clbits()).map(basis_circuit::Clbit).collect();
    let placeholder_gate = Gate::new(gate.op.clone(), formal.as_params());
    circuit
        .apply(placeholder_gate, qubits, clbits)
        .map_err(TranslateError::from)?;
    let dag = CircuitDag::from_circuit(&circuit).map_err(TranslateError::from)?;
    Ok((formal.symbols, dag))
}

/// `example_gates`: one representative `Gate` instance per name in
/// `source_basis`, used only to read each name's arity/param-count when
/// building its placeholder DAG.
#[tracing::instrument(skip(plan, example_gates))]
pub fn compose_transforms(
    plan: &[BasisTransform],
    source_basis: &HashSet<String>,
    example_gates: &HashMap<String, Gate>,
) -> TranslateResult<InstructionMap> {
    let mut mapped_ops: InstructionMap = IndexMap::new();
    for name in source_basis {
        let gate = example_gates
            .get(name)
            .ok_or_else(|| TranslateError::UnmappedGate(name.clone()))?;
        let (formal_params, dag) = placeholder_dag(gate)?;
        mapped_ops.insert(name.clone(), (formal_params, dag));
    }

    for step in plan {
        for (_, (_, dag)) in mapped_ops.iter_mut() {
            let doomed_nodes = dag.named_nodes(&step.gate_name);
            for node in doomed_nodes {
                let actual_params = dag
                    .instruction(node)
                    .map_err(TranslateError::from)?
                    .gate
                    .params
                    .clone();
                let bound = bind_template(&step.formal_params, &actual_params, &step.template)?;
                dag.substitute_node_with_dag(node, &bound).map_err(TranslateError::from)?;
            }
        }
        tracing::trace!(gate_name = %step.gate_name, "composed transform into replacement DAGs");
    }

    Ok(mapped_ops)
}

/// Bind a gate's actual parameters into `(formal_params, dag)`, producing a
/// concrete replacement circuit ready for splicing by the Applier. Shared
/// by the Composer's own construction above and by the Translator driver.
pub fn bind_replacement(
    formal_params: &[ParameterExpression],
    actual_params: &[Param],
    dag: &CircuitDag,
) -> TranslateResult<Circuit> {
    let template = dag.to_circuit().map_err(TranslateError::from)?;
    bind_template(formal_params, actual_params, &template)
}
