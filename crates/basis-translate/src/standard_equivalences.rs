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

//! A seed catalog of textbook single- and two-qubit algebraic identities,
//! used to build the process-wide default [`crate::equivalence::EquivalenceLibrary`]
//! snapshot. The full gate-object catalog (matrices, default decompositions)
//! lives outside this crate; this module supplies only enough of it to make
//! the session library useful out of the box.

use smallvec::smallvec;

use basis_circuit::{Circuit, CustomGate, Gate, Param, ParameterExpression, Qubit, StandardGate};

use crate::equivalence::EquivalenceLibrary;

fn one_qubit_template(build: impl FnOnce(&mut Circuit)) -> Circuit {
    let mut circuit = Circuit::new(1, 0);
    build(&mut circuit);
    circuit
}

pub fn build_standard_library() -> EquivalenceLibrary {
    let mut lib = EquivalenceLibrary::new();

    // h == u2(0, pi)
    let h_template = one_qubit_template(|c| {
        c.apply(
            Gate::standard(StandardGate::U2, smallvec![Param::Float(0.0), Param::Expr(ParameterExpression::pi())]),
            vec![Qubit(0)],
            vec![],
        )
        .expect("fixed-arity template apply cannot fail");
    });
    lib.add(&Gate::standard(StandardGate::H, smallvec![]), vec![], h_template).expect("grounded identity");

    // x == u3(pi, 0, pi)
    let x_template = one_qubit_template(|c| {
        c.apply(
            Gate::standard(
                StandardGate::U3,
                smallvec![
                    Param::Expr(ParameterExpression::pi()),
                    Param::Float(0.0),
                    Param::Expr(ParameterExpression::pi())
                ],
            ),
            vec![Qubit(0)],
            vec![],
        )
        .expect("fixed-arity template apply cannot fail");
    });
    lib.add(&Gate::standard(StandardGate::X, smallvec![]), vec![], x_template).expect("grounded identity");

    // s == p(pi/2), sdg == p(-pi/2), t == p(pi/4), tdg == p(-pi/4)
    for (gate, angle) in [
        (StandardGate::S, std::f64::consts::FRAC_PI_2),
        (StandardGate::Sdg, -std::f64::consts::FRAC_PI_2),
        (StandardGate::T, std::f64::consts::FRAC_PI_4),
        (StandardGate::Tdg, -std::f64::consts::FRAC_PI_4),
    ] {
        let template = one_qubit_template(|c| {
            c.apply(Gate::standard(StandardGate::P, smallvec![Param::Float(angle)]), vec![Qubit(0)], vec![])
                .expect("fixed-arity template apply cannot fail");
        });
        lib.add(&Gate::standard(gate, smallvec![]), vec![], template).expect("grounded identity");
    }

    // rz(theta) == p(theta), up to the global phase the planner does not track.
    let theta = ParameterExpression::symbol("theta");
    let rz_template = one_qubit_template(|c| {
        c.apply(Gate::standard(StandardGate::P, smallvec![Param::Expr(theta.clone())]), vec![Qubit(0)], vec![])
            .expect("fixed-arity template apply cannot fail");
    });
    lib.add(
        &Gate::standard(StandardGate::RZ, smallvec![Param::Expr(theta.clone())]),
        vec![theta.clone()],
        rz_template,
    )
    .expect("grounded identity");

    // swap(q0, q1) == cx(q0,q1); cx(q1,q0); cx(q0,q1)
    let mut swap_template = Circuit::new(2, 0);
    for (a, b) in [(0, 1), (1, 0), (0, 1)] {
        swap_template
            .apply(Gate::standard(StandardGate::CX, smallvec![]), vec![Qubit(a), Qubit(b)], vec![])
            .expect("fixed-arity template apply cannot fail");
    }
    lib.add(&Gate::standard(StandardGate::Swap, smallvec![]), vec![], swap_template).expect("grounded identity");

    // ccx(q0,q1,q2) decomposed into {h, t, tdg, cx} — the standard
    // six-CNOT Toffoli identity (Nielsen & Chuang, Fig. 4.9).
    let mut ccx_template = Circuit::new(3, 0);
    let (q0, q1, q2) = (Qubit(0), Qubit(1), Qubit(2));
    let mut push = |gate: StandardGate, qs: Vec<Qubit>| {
        ccx_template
            .apply(Gate::standard(gate, smallvec![]), qs, vec![])
            .expect("fixed-arity template apply cannot fail");
    };
    push(StandardGate::H, vec![q2]);
    push(StandardGate::CX, vec![q1, q2]);
    push(StandardGate::Tdg, vec![q2]);
    push(StandardGate::CX, vec![q0, q2]);
    push(StandardGate::T, vec![q2]);
    push(StandardGate::CX, vec![q1, q2]);
    push(StandardGate::Tdg, vec![q2]);
    push(StandardGate::CX, vec![q0, q2]);
    push(StandardGate::T, vec![q1]);
    push(StandardGate::T, vec![q2]);
    push(StandardGate::H, vec![q2]);
    push(StandardGate::CX, vec![q0, q1]);
    push(StandardGate::T, vec![q0]);
    push(StandardGate::Tdg, vec![q1]);
    push(StandardGate::CX, vec![q0, q1]);
    lib.add(&Gate::standard(StandardGate::CCX, smallvec![]), vec![], ccx_template).expect("grounded identity");

    lib
}

pub fn measure_instruction_gate() -> Gate {
    Gate::custom(CustomGate::measure(), smallvec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use basis_circuit::unitary::{circuit_unitary, unitary_equiv_up_to_phase};
    use basis_circuit::CircuitDag;

    #[test]
    fn session_catalog_covers_hadamard_and_toffoli() {
        let lib = build_standard_library();
        assert!(lib.has_entry(&Gate::standard(StandardGate::H, smallvec![])));
        let ccx_equivs = lib.get_equivalences("ccx", 3);
        assert_eq!(ccx_equivs.len(), 1);
        let counts = ccx_equivs[0].1.count_ops();
        assert_eq!(counts["cx"], 6);
    }

    #[test]
    fn swap_identity_uses_three_cx() {
        let lib = build_standard_library();
        let swap_equivs = lib.get_equivalences("swap", 2);
        assert_eq!(swap_equivs[0].1.count_ops()["cx"], 3);
    }

    /// For every unparameterized equivalence in the base catalog, the
    /// template's composed unitary must equal the gate's own unitary up to
    /// global phase.
    #[test]
    fn fixed_equivalences_preserve_unitary() {
        let lib = build_standard_library();
        for (gate_name, arity) in [("h", 1), ("x", 1), ("s", 1), ("sdg", 1), ("t", 1), ("tdg", 1), ("swap", 2), ("ccx", 3)] {
            let gate = match gate_name {
                "h" => Gate::standard(StandardGate::H, smallvec![]),
                "x" => Gate::standard(StandardGate::X, smallvec![]),
                "s" => Gate::standard(StandardGate::S, smallvec![]),
                "sdg" => Gate::standard(StandardGate::Sdg, smallvec![]),
                "t" => Gate::standard(StandardGate::T, smallvec![]),
                "tdg" => Gate::standard(StandardGate::Tdg, smallvec![]),
                "swap" => Gate::standard(StandardGate::Swap, smallvec![]),
                "ccx" => Gate::standard(StandardGate::CCX, smallvec![]),
                _ => unreachable!(),
            };
            let expected = gate.op.matrix(&gate.params).expect("standard gate always has a matrix");
            let (_, template) = &lib.get_equivalences(gate_name, arity)[0];
            let actual = circuit_unitary(template).expect("template gates all have matrices");
            assert!(
                unitary_equiv_up_to_phase(&expected, &actual, 1e-9),
                "equivalence for '{gate_name}' does not preserve its gate's unitary"
            );
        }
    }

    /// `rz(theta) == p(theta)` up to global phase, for a spread of sampled
    /// theta values.
    #[test]
    fn parameterized_rz_equivalence_preserves_unitary_across_samples() {
        let lib = build_standard_library();
        let (formal_params, template) = &lib.get_equivalences("rz", 1)[0];
        for theta in [0.0, 0.3, -1.1, std::f64::consts::FRAC_PI_3, 2.9, -std::f64::consts::PI] {
            let gate = Gate::standard(StandardGate::RZ, smallvec![Param::Float(theta)]);
            let expected = gate.op.matrix(&gate.params).expect("rz always has a matrix");
            let dag = CircuitDag::from_circuit(template).unwrap();
            let bound = crate::compose_transforms::bind_replacement(formal_params, &gate.params, &dag).unwrap();
            let actual = circuit_unitary(&bound).expect("bound template gates all have matrices");
            assert!(
                unitary_equiv_up_to_phase(&expected, &actual, 1e-9),
                "rz({theta}) equivalence does not preserve unitary"
            );
        }
    }
}
