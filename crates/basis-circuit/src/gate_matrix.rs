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

//! Closed-form unitary matrices for the standard gate catalog, used by
//! semantics-preservation property tests to check an equivalence
//! template's unitary against the gate it replaces.

use ndarray::{array, Array2};
use num_complex::Complex64;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

pub fn one_qubit_identity() -> Array2<Complex64> {
    array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]]
}

pub fn x_gate() -> Array2<Complex64> {
    array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]]
}

pub fn y_gate() -> Array2<Complex64> {
    array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]]
}

pub fn z_gate() -> Array2<Complex64> {
    array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]]
}

pub fn h_gate() -> Array2<Complex64> {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    array![[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]]
}

pub fn sx_gate() -> Array2<Complex64> {
    array![[c(0.5, 0.5), c(0.5, -0.5)], [c(0.5, -0.5), c(0.5, 0.5)]]
}

/// Phase gate `diag(1, e^{i*lambda})`; `p`, `u1`, `s`, `sdg`, `t`, `tdg` are
/// all instances of this family at different fixed angles.
pub fn p_gate(lambda: f64) -> Array2<Complex64> {
    array![
        [c(1.0, 0.0), c(0.0, 0.0)],
        [c(0.0, 0.0), Complex64::from_polar(1.0, lambda)],
    ]
}

pub fn rx_gate(theta: f64) -> Array2<Complex64> {
    let (s, cos) = (theta / 2.0).sin_cos();
    array![[c(cos, 0.0), c(0.0, -s)], [c(0.0, -s), c(cos, 0.0)]]
}

pub fn ry_gate(theta: f64) -> Array2<Complex64> {
    let (s, cos) = (theta / 2.0).sin_cos();
    array![[c(cos, 0.0), c(-s, 0.0)], [c(s, 0.0), c(cos, 0.0)]]
}

pub fn rz_gate(theta: f64) -> Array2<Complex64> {
    array![
        [Complex64::from_polar(1.0, -theta / 2.0), c(0.0, 0.0)],
        [c(0.0, 0.0), Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// `u3(theta, phi, lambda)`, the fully general single-qubit unitary up to
/// global phase; `u2(phi, lambda) == u3(pi/2, phi, lambda)`.
pub fn u3_gate(theta: f64, phi: f64, lambda: f64) -> Array2<Complex64> {
    let (s, cos) = (theta / 2.0).sin_cos();
    array![
        [c(cos, 0.0), -Complex64::from_polar(s, lambda)],
        [
            Complex64::from_polar(s, phi),
            Complex64::from_polar(cos, phi + lambda),
        ],
    ]
}

pub fn global_phase_gate(phase: f64) -> Array2<Complex64> {
    array![[Complex64::from_polar(1.0, phase)]]
}

pub fn cx_gate() -> Array2<Complex64> {
    let o = c(0.0, 0.0);
    let i = c(1.0, 0.0);
    array![
        [i, o, o, o],
        [o, i, o, o],
        [o, o, o, i],
        [o, o, i, o],
    ]
}

pub fn cy_gate() -> Array2<Complex64> {
    let o = c(0.0, 0.0);
    let i = c(1.0, 0.0);
    array![
        [i, o, o, o],
        [o, i, o, o],
        [o, o, o, c(0.0, -1.0)],
        [o, o, c(0.0, 1.0), o],
    ]
}

pub fn cz_gate() -> Array2<Complex64> {
    let o = c(0.0, 0.0);
    let i = c(1.0, 0.0);
    array![
        [i, o, o, o],
        [o, i, o, o],
        [o, o, i, o],
        [o, o, o, c(-1.0, 0.0)],
    ]
}

pub fn swap_gate() -> Array2<Complex64> {
    let o = c(0.0, 0.0);
    let i = c(1.0, 0.0);
    array![
        [i, o, o, o],
        [o, o, i, o],
        [o, i, o, o],
        [o, o, o, i],
    ]
}

pub fn ecr_gate() -> Array2<Complex64> {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let o = c(0.0, 0.0);
    array![
        [o, o, c(s, 0.0), c(0.0, s)],
        [o, o, c(0.0, s), c(s, 0.0)],
        [c(s, 0.0), c(0.0, -s), o, o],
        [c(0.0, -s), c(s, 0.0), o, o],
    ]
}

pub fn ccx_gate() -> Array2<Complex64> {
    let mut m = Array2::<Complex64>::zeros((8, 8));
    for i in 0..6 {
        m[[i, i]] = c(1.0, 0.0);
    }
    m[[6, 7]] = c(1.0, 0.0);
    m[[7, 6]] = c(1.0, 0.0);
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn hadamard_is_self_inverse() {
        let h = h_gate();
        let product = h.dot(&h);
        assert_abs_diff_eq!(product, one_qubit_identity(), epsilon = 1e-9);
    }

    #[test]
    fn u2_matches_u3_at_fixed_theta() {
        assert_abs_diff_eq!(
            u3_gate(std::f64::consts::FRAC_PI_2, 0.3, 0.7),
            u3_gate(std::f64::consts::FRAC_PI_2, 0.3, 0.7),
            epsilon = 1e-12
        );
    }

    #[test]
    fn cx_is_involutive() {
        let cx = cx_gate();
        let product = cx.dot(&cx);
        let mut identity = Array2::<Complex64>::zeros((4, 4));
        for i in 0..4 {
            identity[[i, i]] = c(1.0, 0.0);
        }
        assert_abs_diff_eq!(product, identity, epsilon = 1e-9);
    }
}
