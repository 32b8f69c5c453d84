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

//! The in-memory DAG representation of a circuit: one node per input/output
//! sentinel per wire, one node per gate instance, edges expressing
//! per-wire data flow. Must round-trip losslessly with [`crate::circuit_data::Circuit`].

use ahash::AHashMap;
use rustworkx_core::petgraph::stable_graph::{NodeIndex, StableDiGraph};
use rustworkx_core::petgraph::visit::EdgeRef;
use rustworkx_core::petgraph::Direction;

use crate::bit::{Clbit, Qubit};
use crate::circuit_data::{Circuit, Instruction};
use crate::error::{CircuitError, CircuitResult};
use crate::operations::Gate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wire {
    Qubit(Qubit),
    Clbit(Clbit),
}

#[derive(Clone, Debug)]
pub enum NodeType {
    In(Wire),
    Out(Wire),
    Op(Instruction),
}

impl NodeType {
    pub fn as_instruction(&self) -> Option<&Instruction> {
        match self {
            NodeType::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// `StableDiGraph` so that node removal (substitution) never invalidates
/// other nodes' indices.
#[derive(Clone)]
pub struct CircuitDag {
    graph: StableDiGraph<NodeType, Wire>,
    qubit_in: Vec<NodeIndex>,
    qubit_out: Vec<NodeIndex>,
    clbit_in: Vec<NodeIndex>,
    clbit_out: Vec<NodeIndex>,
    /// Last node touching each wire, for O(1) `apply_operation_back`
    /// splicing — the same "wire front" bookkeeping the sibling compiler-IR
    /// codebase uses for the same reason (see DESIGN.md).
    wire_front: AHashMap<Wire, NodeIndex>,
    num_qubits: u32,
    num_clbits: u32,
    global_phase: crate::param_expression::ParameterExpression,
}

impl CircuitDag {
    pub fn new(num_qubits: u32, num_clbits: u32) -> Self {
        let mut graph = StableDiGraph::new();
        let mut qubit_in = Vec::with_capacity(num_qubits as usize);
        let mut qubit_out = Vec::with_capacity(num_qubits as usize);
        let mut clbit_in = Vec::with_capacity(num_clbits as usize);
        let mut clbit_out = Vec::with_capacity(num_clbits as usize);
        let mut wire_front = AHashMap::default();

        for i in 0..num_qubits {
            let wire = Wire::Qubit(Qubit(i));
            let input = graph.add_node(NodeType::In(wire));
            let output = graph.add_node(NodeType::Out(wire));
            qubit_in.push(input);
            qubit_out.push(output);
            wire_front.insert(wire, input);
        }
        for i in 0..num_clbits {
            let wire = Wire::Clbit(Clbit(i));
            let input = graph.add_node(NodeType::In(wire));
            let output = graph.add_node(NodeType::Out(wire));
            clbit_in.push(input);
            clbit_out.push(output);
            wire_front.insert(wire, input);
        }

        CircuitDag {
            graph,
            qubit_in,
            qubit_out,
            clbit_in,
            clbit_out,
            wire_front,
            num_qubits,
            num_clbits,
            global_phase: crate::param_expression::ParameterExpression::constant(0.0),
        }
    }

    pub fn from_circuit(circuit: &Circuit) -> CircuitResult<Self> {
        let mut dag = CircuitDag::new(circuit.num_qubits, circuit.num_clbits);
        dag.global_phase = circuit.global_phase.clone();
        for inst in &circuit.data {
            dag.apply_operation_back(inst.gate.clone(), inst.qubits.clone().into_vec(), inst.clbits.clone().into_vec())?;
        }
        Ok(dag)
    }

    /// Lossless round-trip back to the sequential representation, visiting
    /// op-nodes in topological order.
    pub fn to_circuit(&self) -> CircuitResult<Circuit> {
        let mut circuit = Circuit::new(self.num_qubits, self.num_clbits);
        circuit.global_phase = self.global_phase.clone();
        for node in self.topological_op_nodes()? {
            let inst = self.graph[node].as_instruction().expect("op node");
            circuit.apply(inst.gate.clone(), inst.qubits.clone(), inst.clbits.clone())?;
        }
        Ok(circuit)
    }

    fn wire_out_node(&self, wire: Wire) -> NodeIndex {
        match wire {
            Wire::Qubit(q) => self.qubit_out[q.index()],
            Wire::Clbit(c) => self.clbit_out[c.index()],
        }
    }

    /// Append a gate instance at the current end of every wire it touches.
    pub fn apply_operation_back(&mut self, gate: Gate, qubits: Vec<Qubit>, clbits: Vec<Clbit>) -> CircuitResult<NodeIndex> {
        if qubits.len() as u32 != gate.num_qubits() {
            return Err(CircuitError::QubitCountMismatch {
                name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len() as u32,
            });
        }
        for &q in &qubits {
            if q.0 >= self.num_qubits {
                return Err(CircuitError::QubitOutOfRange { qubit: q, num_qubits: self.num_qubits });
            }
        }
        let inst = Instruction::new(gate, qubits.clone().into_iter().collect::<smallvec::SmallVec<[Qubit; 4]>>(), clbits.clone().into_iter().collect::<smallvec::SmallVec<[Clbit; 2]>>());
        let node = self.graph.add_node(NodeType::Op(inst));
        let wires: Vec<Wire> = qubits
            .into_iter()
            .map(Wire::Qubit)
            .chain(clbits.into_iter().map(Wire::Clbit))
            .collect();
        self.splice_at_back(node, &wires);
        Ok(node)
    }

    /// Insert `node` at the tail of each wire in `wires`, rewiring the
    /// previous tail → node → output-sentinel.
    fn splice_at_back(&mut self, node: NodeIndex, wires: &[Wire]) {
        for &wire in wires {
            let out = self.wire_out_node(wire);
            let prev = self.wire_front.get(&wire).copied().unwrap_or(out);
            if let Some(edge) = self.graph.find_edge(prev, out) {
                self.graph.remove_edge(edge);
            }
            self.graph.add_edge(prev, node, wire);
            self.graph.add_edge(node, out, wire);
            self.wire_front.insert(wire, node);
        }
    }

    pub fn op_nodes(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&n| matches!(self.graph[n], NodeType::Op(_)))
            .collect()
    }

    pub fn named_nodes(&self, name: &str) -> Vec<NodeIndex> {
        self.op_nodes()
            .into_iter()
            .filter(|&n| self.graph[n].as_instruction().map(|i| i.name() == name).unwrap_or(false))
            .collect()
    }

    pub fn instruction(&self, node: NodeIndex) -> CircuitResult<&Instruction> {
        self.graph
            .node_weight(node)
            .and_then(NodeType::as_instruction)
            .ok_or_else(|| CircuitError::NodeNotFound(format!("{node:?}")))
    }

    /// Topological order inherited from the DAG's own iteration contract,
    /// giving the applier a deterministic node visitation order.
    pub fn topological_op_nodes(&self) -> CircuitResult<Vec<NodeIndex>> {
        let order = rustworkx_core::petgraph::algo::toposort(&self.graph, None)
            .map_err(|_| CircuitError::InvalidDag("cycle detected".to_string()))?;
        Ok(order
            .into_iter()
            .filter(|&n| matches!(self.graph[n], NodeType::Op(_)))
            .collect())
    }

    /// In-place single-node substitution: replace `node`'s gate with `new_gate`,
    /// keeping its wires (and their order) unchanged. Used when a binding
    /// produces a replacement of matching arity.
    pub fn substitute_node(&mut self, node: NodeIndex, new_gate: Gate) -> CircuitResult<()> {
        let inst = self
            .graph
            .node_weight_mut(node)
            .and_then(|n| match n {
                NodeType::Op(inst) => Some(inst),
                _ => None,
            })
            .ok_or_else(|| CircuitError::NodeNotFound(format!("{node:?}")))?;
        if new_gate.num_qubits() != inst.qubits.len() as u32 {
            return Err(CircuitError::QubitCountMismatch {
                name: new_gate.name().to_string(),
                expected: new_gate.num_qubits(),
                got: inst.qubits.len() as u32,
            });
        }
        inst.gate = new_gate;
        Ok(())
    }

    /// Replace `node` with the instructions of `replacement`, spliced in at
    /// exactly `node`'s position in each wire's total order — never
    /// appended at the wire's tail, which would silently reorder every
    /// instruction downstream of `node` (see DESIGN.md for the regression
    /// this guards against).
    ///
    /// `replacement`'s qubits/clbits are matched positionally to `node`'s
    /// own qubit/clbit argument lists.
    pub fn substitute_node_with_dag(&mut self, node: NodeIndex, replacement: &Circuit) -> CircuitResult<()> {
        let (node_qubits, node_clbits) = {
            let inst = self.instruction(node)?;
            (inst.qubits.clone().into_vec(), inst.clbits.clone().into_vec())
        };
        if replacement.num_qubits != node_qubits.len() as u32 || replacement.num_clbits != node_clbits.len() as u32 {
            return Err(CircuitError::QubitCountMismatch {
                name: "substitute_node_with_dag".to_string(),
                expected: node_qubits.len() as u32,
                got: replacement.num_qubits,
            });
        }

        let wires_of = |qs: &[Qubit], cs: &[Clbit]| -> Vec<Wire> {
            qs.iter().copied().map(Wire::Qubit).chain(cs.iter().copied().map(Wire::Clbit)).collect()
        };
        let outer_wires = wires_of(&node_qubits, &node_clbits);

        // Predecessor/successor edges of `node` on each of its wires, captured
        // before `node` is removed, so the replacement's first/last
        // instructions on that wire are stitched into exactly this slot
        // rather than appended at the wire's current tail.
        let mut front: AHashMap<Wire, NodeIndex> = AHashMap::default();
        let mut succ: AHashMap<Wire, NodeIndex> = AHashMap::default();
        for edge in self.graph.edges_directed(node, Direction::Incoming) {
            front.insert(*edge.weight(), edge.source());
        }
        for edge in self.graph.edges_directed(node, Direction::Outgoing) {
            succ.insert(*edge.weight(), edge.target());
        }
        if outer_wires.iter().any(|w| !front.contains_key(w)) {
            return Err(CircuitError::InvalidDag(
                "substitute_node_with_dag: node is missing an incoming edge on one of its wires".to_string(),
            ));
        }
        self.graph.remove_node(node);

        // `replacement`'s local qubit/clbit index i is bound positionally to
        // `node`'s own i-th qubit/clbit argument.
        for inst in &replacement.data {
            let mapped_qubits: Vec<Qubit> = inst.qubits.iter().map(|&lq| node_qubits[lq.index()]).collect();
            let mapped_clbits: Vec<Clbit> = inst.clbits.iter().map(|&lc| node_clbits[lc.index()]).collect();
            let new_node = self.graph.add_node(NodeType::Op(Instruction::new(
                inst.gate.clone(),
                mapped_qubits.clone(),
                mapped_clbits.clone(),
            )));
            for wire in wires_of(&mapped_qubits, &mapped_clbits) {
                let from = *front.get(&wire).expect("every outer wire has a front by construction");
                self.graph.add_edge(from, new_node, wire);
                front.insert(wire, new_node);
            }
        }

        // Stitch the replacement's tail (or, for a wire the replacement
        // never touched, the original predecessor) onto whatever followed
        // `node`.
        for &outer_wire in &outer_wires {
            let tail = *front.get(&outer_wire).expect("front populated above");
            if let Some(&next) = succ.get(&outer_wire) {
                self.graph.add_edge(tail, next, outer_wire);
            } else {
                self.wire_front.insert(outer_wire, tail);
            }
        }

        Ok(())
    }

    pub fn verify_integrity(&self) -> CircuitResult<()> {
        rustworkx_core::petgraph::algo::toposort(&self.graph, None)
            .map_err(|_| CircuitError::InvalidDag("cycle detected".to_string()))?;
        let all_wires: Vec<Wire> = (0..self.num_qubits)
            .map(|i| Wire::Qubit(Qubit(i)))
            .chain((0..self.num_clbits).map(|i| Wire::Clbit(Clbit(i))))
            .collect();
        for wire in all_wires {
            let input = match wire {
                Wire::Qubit(q) => self.qubit_in[q.index()],
                Wire::Clbit(c) => self.clbit_in[c.index()],
            };
            let output = self.wire_out_node(wire);
            let mut current = input;
            let mut steps = 0usize;
            let limit = self.graph.node_count() + 1;
            loop {
                let mut next = None;
                for edge in self.graph.edges_directed(current, Direction::Outgoing) {
                    if *edge.weight() == wire {
                        next = Some(edge.target());
                        break;
                    }
                }
                match next {
                    Some(n) => {
                        current = n;
                        steps += 1;
                        if steps > limit {
                            return Err(CircuitError::InvalidDag(format!("wire {wire:?} does not terminate")));
                        }
                        if current == output {
                            break;
                        }
                    }
                    None => {
                        return Err(CircuitError::InvalidDag(format!("wire {wire:?} breaks before reaching its output sentinel")));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::StandardGate;

    fn bell_circuit() -> Circuit {
        let mut circuit = Circuit::new(2, 0);
        circuit.apply(Gate::standard(StandardGate::H, smallvec::SmallVec::new()), vec![Qubit(0)], vec![]).unwrap();
        circuit.apply(Gate::standard(StandardGate::CX, smallvec::SmallVec::new()), vec![Qubit(0), Qubit(1)], vec![]).unwrap();
        circuit
    }

    #[test]
    fn round_trip_preserves_op_order() {
        let circuit = bell_circuit();
        let dag = CircuitDag::from_circuit(&circuit).unwrap();
        dag.verify_integrity().unwrap();
        let round_tripped = dag.to_circuit().unwrap();
        let names: Vec<&str> = round_tripped.data.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "cx"]);
    }

    #[test]
    fn substitute_node_with_dag_preserves_position() {
        let mut circuit = Circuit::new(1, 0);
        circuit.apply(Gate::standard(StandardGate::H, smallvec::SmallVec::new()), vec![Qubit(0)], vec![]).unwrap();
        circuit.apply(Gate::standard(StandardGate::X, smallvec::SmallVec::new()), vec![Qubit(0)], vec![]).unwrap();
        circuit.apply(Gate::standard(StandardGate::Z, smallvec::SmallVec::new()), vec![Qubit(0)], vec![]).unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        let middle = dag.named_nodes("x")[0];

        let mut replacement = Circuit::new(1, 0);
        replacement.apply(Gate::standard(StandardGate::Y, smallvec::SmallVec::new()), vec![Qubit(0)], vec![]).unwrap();
        replacement.apply(Gate::standard(StandardGate::Y, smallvec::SmallVec::new()), vec![Qubit(0)], vec![]).unwrap();

        dag.substitute_node_with_dag(middle, &replacement).unwrap();
        dag.verify_integrity().unwrap();
        let result = dag.to_circuit().unwrap();
        let names: Vec<&str> = result.data.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "y", "y", "z"]);
    }

    #[test]
    fn substitute_node_keeps_wires() {
        let mut circuit = Circuit::new(1, 0);
        circuit.apply(Gate::standard(StandardGate::H, smallvec::SmallVec::new()), vec![Qubit(0)], vec![]).unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        let node = dag.named_nodes("h")[0];
        dag.substitute_node(node, Gate::standard(StandardGate::X, smallvec::SmallVec::new())).unwrap();
        let result = dag.to_circuit().unwrap();
        assert_eq!(result.data[0].name(), "x");
    }
}
