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

//! The A* planner over sets of gate names.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashSet};

use ahash::{AHashMap, AHashSet};
use basis_circuit::{Circuit, ParameterExpression};

use crate::equivalence::EquivalenceLibrary;
use crate::error::{TranslateError, TranslateResult};

/// Defensive upper bound on a gate's arity, used only when validating a
/// freshly-inserted gate — *not* as a search-time loop bound. Edge
/// generation instead walks only the arities `EquivalenceLibrary::arities_for`
/// actually holds entries for.
pub const MAX_ARITY: u32 = 20;

const EDGE_COST: f64 = 1e-3;

/// A frozen set of gate names: one node of the planner's search graph.
type Basis = BTreeSet<String>;

/// One step of a plan: rewrite every remaining instance of `gate_name` using
/// `template`, whose op-nodes' parameters are expressed in terms of
/// `formal_params`.
#[derive(Clone, Debug)]
pub struct BasisTransform {
    pub gate_name: String,
    pub gate_arity: u32,
    pub formal_params: Vec<ParameterExpression>,
    pub template: Circuit,
}

#[derive(Clone)]
struct QueueEntry {
    est_total_cost: f64,
    tie_break: u64,
    basis: Basis,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.est_total_cost == other.est_total_cost && self.tie_break == other.tie_break
    }
}
impl Eq for QueueEntry {}

/// `BinaryHeap` is a max-heap; this `Ord` impl inverts both the cost and
/// the tie-break comparisons so the heap pops the *minimum*
/// `(est_total_cost, tie_break)` pair first, with ties broken by a strictly
/// increasing insertion counter so the search is fully deterministic.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .est_total_cost
            .partial_cmp(&self.est_total_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.tie_break.cmp(&self.tie_break))
    }
}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn heuristic(basis: &Basis, target: &Basis) -> f64 {
    basis.symmetric_difference(target).count() as f64
}

struct CameFrom {
    prev: Basis,
    gate_name: String,
    gate_arity: u32,
    formal_params: Vec<ParameterExpression>,
    template: Circuit,
}

/// Run the A* search; `budget` bounds the number of states popped off the
/// frontier (`None` for unbounded). Returns the ordered plan, or
/// `BasisUnreachable`/`BudgetExceeded`.
#[tracing::instrument(skip(lib, source_basis, target_basis), fields(source_len = source_basis.len(), target_len = target_basis.len()))]
pub fn basis_search(
    lib: &EquivalenceLibrary,
    source_basis: &HashSet<String>,
    target_basis: &HashSet<String>,
    budget: Option<usize>,
) -> TranslateResult<Vec<BasisTransform>> {
    let start: Basis = source_basis.iter().cloned().collect();
    let target: Basis = target_basis.iter().cloned().collect();

    if start.is_subset(&target) {
        tracing::debug!("source basis already a subset of target basis, empty plan");
        return Ok(Vec::new());
    }

    let mut open_heap: BinaryHeap<QueueEntry> = BinaryHeap::new();
    let mut best_cost: AHashMap<Basis, f64> = AHashMap::new();
    let mut came_from: AHashMap<Basis, CameFrom> = AHashMap::new();
    let mut closed: AHashSet<Basis> = AHashSet::new();
    let mut tie_break_counter: u64 = 0;
    let mut pops = 0usize;

    best_cost.insert(start.clone(), 0.0);
    open_heap.push(QueueEntry {
        est_total_cost: heuristic(&start, &target),
        tie_break: tie_break_counter,
        basis: start.clone(),
    });
    tie_break_counter += 1;

    while let Some(QueueEntry { basis: current, .. }) = open_heap.pop() {
        if closed.contains(&current) {
            continue;
        }
        pops += 1;
        if let Some(limit) = budget {
            if pops > limit {
                return Err(TranslateError::BudgetExceeded(limit));
            }
        }

        if current.is_subset(&target) {
            tracing::debug!(plan_len = tracing::field::Empty, "goal state reached");
            return Ok(reconstruct_path(&came_from, &current));
        }

        closed.insert(current.clone());
        let current_cost = *best_cost.get(&current).unwrap_or(&f64::INFINITY);

        for gate_name in current.iter().cloned().collect::<Vec<_>>() {
            for arity in lib.arities_for(&gate_name).collect::<Vec<_>>() {
                if !lib.is_search_base(&gate_name, arity) {
                    continue;
                }
                for (formal_params, template) in lib.get_equivalences(&gate_name, arity) {
                    let mut neighbor = current.clone();
                    neighbor.remove(&gate_name);
                    for name in template.op_names() {
                        neighbor.insert(name);
                    }
                    let tentative_cost = current_cost + EDGE_COST;
                    let improves = tentative_cost < *best_cost.get(&neighbor).unwrap_or(&f64::INFINITY);
                    if improves {
                        best_cost.insert(neighbor.clone(), tentative_cost);
                        came_from.insert(
                            neighbor.clone(),
                            CameFrom {
                                prev: current.clone(),
                                gate_name: gate_name.clone(),
                                gate_arity: arity,
                                formal_params: formal_params.clone(),
                                template: template.clone(),
                            },
                        );
                        open_heap.push(QueueEntry {
                            est_total_cost: tentative_cost + heuristic(&neighbor, &target),
                            tie_break: tie_break_counter,
                            basis: neighbor,
                        });
                        tie_break_counter += 1;
                    }
                }
            }
        }
    }

    Err(TranslateError::BasisUnreachable {
        source: source_basis.iter().cloned().collect(),
        target: target_basis.iter().cloned().collect(),
    })
}

fn reconstruct_path(came_from: &AHashMap<Basis, CameFrom>, goal: &Basis) -> Vec<BasisTransform> {
    let mut path = Vec::new();
    let mut current = goal.clone();
    while let Some(step) = came_from.get(&current) {
        path.push(BasisTransform {
            gate_name: step.gate_name.clone(),
            gate_arity: step.gate_arity,
            formal_params: step.formal_params.clone(),
            template: step.template.clone(),
        });
        current = step.prev.clone();
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equivalence::EquivalenceLibrary;
    use basis_circuit::{CustomGate, Gate, Qubit, StandardGate};
    use smallvec::smallvec;

    fn library_with_testgate_to_cx_z() -> EquivalenceLibrary {
        let mut lib = EquivalenceLibrary::new();
        let mut template = Circuit::new(2, 0);
        template.apply(Gate::standard(StandardGate::CX, smallvec![]), vec![Qubit(0), Qubit(1)], vec![]).unwrap();
        template.apply(Gate::standard(StandardGate::Z, smallvec![]), vec![Qubit(1)], vec![]).unwrap();
        template.apply(Gate::standard(StandardGate::CX, smallvec![]), vec![Qubit(0), Qubit(1)], vec![]).unwrap();
        lib.add(&Gate::custom(CustomGate::new("testgate", 2, 0), smallvec![]), vec![], template).unwrap();
        lib
    }

    #[test]
    fn finds_a_two_step_plan() {
        let lib = library_with_testgate_to_cx_z();
        let source: HashSet<String> = ["testgate".to_string()].into_iter().collect();
        let target: HashSet<String> = ["cx".to_string(), "z".to_string()].into_iter().collect();
        let plan = basis_search(&lib, &source, &target, None).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].gate_name, "testgate");
    }

    #[test]
    fn already_subset_returns_empty_plan() {
        let lib = EquivalenceLibrary::new();
        let source: HashSet<String> = ["measure".to_string()].into_iter().collect();
        let target: HashSet<String> = ["measure".to_string()].into_iter().collect();
        let plan = basis_search(&lib, &source, &target, None).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn unreachable_basis_is_an_error() {
        let lib = EquivalenceLibrary::new();
        let source: HashSet<String> = ["testgate".to_string()].into_iter().collect();
        let target: HashSet<String> = ["cx".to_string()].into_iter().collect();
        let result = basis_search(&lib, &source, &target, None);
        assert!(matches!(result, Err(TranslateError::BasisUnreachable { .. })));
    }

    #[test]
    fn determinism_given_identical_inputs() {
        let lib = library_with_testgate_to_cx_z();
        let source: HashSet<String> = ["testgate".to_string()].into_iter().collect();
        let target: HashSet<String> = ["cx".to_string(), "z".to_string()].into_iter().collect();
        let first = basis_search(&lib, &source, &target, None).unwrap();
        let second = basis_search(&lib, &source, &target, None).unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].gate_name, second[0].gate_name);
    }

    #[test]
    fn budget_exceeded_on_tight_limit() {
        let lib = library_with_testgate_to_cx_z();
        let source: HashSet<String> = ["testgate".to_string()].into_iter().collect();
        let target: HashSet<String> = ["cx".to_string(), "z".to_string()].into_iter().collect();
        let result = basis_search(&lib, &source, &target, Some(0));
        assert!(matches!(result, Err(TranslateError::BudgetExceeded(0))));
    }

    #[test]
    fn non_search_base_entry_is_unreachable_as_a_hop() {
        let mut lib = library_with_testgate_to_cx_z();
        lib.set_entry("testgate", 2, lib.get_equivalences("testgate", 2).to_vec(), false);
        let source: HashSet<String> = ["testgate".to_string()].into_iter().collect();
        let target: HashSet<String> = ["cx".to_string(), "z".to_string()].into_iter().collect();
        let result = basis_search(&lib, &source, &target, None);
        assert!(matches!(result, Err(TranslateError::BasisUnreachable { .. })));
    }

    #[test]
    fn non_search_base_entry_still_answers_direct_lookup() {
        let mut lib = library_with_testgate_to_cx_z();
        lib.set_entry("testgate", 2, lib.get_equivalences("testgate", 2).to_vec(), false);
        assert_eq!(lib.get_equivalences("testgate", 2).len(), 1);
        assert!(!lib.is_search_base("testgate", 2));
    }
}
