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

//! Dense unitary composition for small circuits, used to check that an
//! equivalence template's unitary matches the gate it replaces.

use ndarray::Array2;
use num_complex::Complex64;

use crate::circuit_data::Circuit;
use crate::operations::Operation;

/// Expand a `k`-qubit gate matrix (acting on `qubits`, first-listed most
/// significant within its own block) into an `n`-qubit matrix acting on the
/// full register, leaving every other qubit untouched.
fn expand_to_full(gate: &Array2<Complex64>, qubits: &[crate::bit::Qubit], n: usize) -> Option<Array2<Complex64>> {
    let k = qubits.len();
    let dim = 1usize << n;
    let gdim = 1usize << k;
    if gate.shape() != [gdim, gdim] {
        return None;
    }
    let mut full = Array2::<Complex64>::zeros((dim, dim));
    for row in 0..dim {
        for col in 0..dim {
            let mut outside_matches = true;
            for q in 0..n {
                if qubits.iter().any(|qu| qu.index() == q) {
                    continue;
                }
                if ((row >> q) & 1) != ((col >> q) & 1) {
                    outside_matches = false;
                    break;
                }
            }
            if !outside_matches {
                continue;
            }
            let mut grow = 0usize;
            let mut gcol = 0usize;
            for (gi, qu) in qubits.iter().enumerate() {
                let bit_pos = qu.index();
                let bitr = (row >> bit_pos) & 1;
                let bitc = (col >> bit_pos) & 1;
                let shift = k - 1 - gi;
                grow |= bitr << shift;
                gcol |= bitc << shift;
            }
            full[[row, col]] = gate[[grow, gcol]];
        }
    }
    Some(full)
}

/// The dense unitary of `circuit`, applying its instructions left-to-right
/// and folding in `global_phase`. `None` if any instruction's gate has no
/// matrix (a measurement or other non-unitary op) or a still-symbolic
/// parameter.
pub fn circuit_unitary(circuit: &Circuit) -> Option<Array2<Complex64>> {
    let n = circuit.num_qubits as usize;
    let dim = 1usize << n;
    let mut acc = Array2::<Complex64>::zeros((dim, dim));
    for i in 0..dim {
        acc[[i, i]] = Complex64::new(1.0, 0.0);
    }
    for inst in &circuit.data {
        let gate_matrix = inst.gate.op.matrix(&inst.gate.params)?;
        let expanded = expand_to_full(&gate_matrix, &inst.qubits, n)?;
        acc = expanded.dot(&acc);
    }
    let phase = circuit.global_phase.as_f64()?;
    let phase_factor = Complex64::from_polar(1.0, phase);
    acc.mapv_inplace(|x| x * phase_factor);
    Some(acc)
}

/// Whether two same-shape unitaries agree up to a global phase: find the
/// first entry where either matrix is non-negligible, use its phase ratio
/// to align them, then compare elementwise.
pub fn unitary_equiv_up_to_phase(a: &Array2<Complex64>, b: &Array2<Complex64>, epsilon: f64) -> bool {
    if a.shape() != b.shape() {
        return false;
    }
    let mut alignment: Option<Complex64> = None;
    for (x, y) in a.iter().zip(b.iter()) {
        if x.norm() > epsilon || y.norm() > epsilon {
            if x.norm() < epsilon || y.norm() < epsilon {
                return false;
            }
            alignment = Some(x / y);
            break;
        }
    }
    let Some(align) = alignment else {
        return true;
    };
    a.iter().zip(b.iter()).all(|(x, y)| (x - y * align).norm() < epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit::Qubit;
    use crate::circuit_data::Circuit;
    use crate::operations::{Gate, StandardGate};
    use smallvec::smallvec;

    #[test]
    fn bell_circuit_unitary_matches_hand_composed() {
        let mut circuit = Circuit::new(2, 0);
        circuit.apply(Gate::standard(StandardGate::H, smallvec![]), vec![Qubit(0)], vec![]).unwrap();
        circuit.apply(Gate::standard(StandardGate::CX, smallvec![]), vec![Qubit(0), Qubit(1)], vec![]).unwrap();
        let u = circuit_unitary(&circuit).unwrap();
        assert_eq!(u.shape(), [4, 4]);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((u[[0, 0]].re - s).abs() < 1e-9);
        assert!((u[[3, 0]].re - s).abs() < 1e-9);
    }

    #[test]
    fn identical_matrices_are_equivalent_up_to_phase() {
        let a = crate::gate_matrix::x_gate();
        let mut b = a.clone();
        b.mapv_inplace(|v| v * Complex64::from_polar(1.0, 1.2345));
        assert!(unitary_equiv_up_to_phase(&a, &b, 1e-9));
    }

    #[test]
    fn distinct_matrices_are_not_equivalent() {
        assert!(!unitary_equiv_up_to_phase(&crate::gate_matrix::x_gate(), &crate::gate_matrix::z_gate(), 1e-9));
    }
}
