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

//! A basis-translation compiler pass: rewrites a circuit DAG so that every
//! op-node is drawn from a caller-supplied target gate-name basis, using an
//! [`equivalence::EquivalenceLibrary`] of algebraic rewrite rules and an A*
//! search over sets of gate names.

pub mod basis_search;
pub mod basis_translator;
pub mod compose_transforms;
pub mod equivalence;
pub mod error;
pub mod standard_equivalences;
pub mod synthesize_unitaries;

pub use basis_search::{basis_search as run_basis_search, BasisTransform, MAX_ARITY};
pub use basis_translator::BasisTranslator;
pub use compose_transforms::{compose_transforms as run_compose_transforms, InstructionMap};
pub use equivalence::{initialize_base_session, session, Equivalence, EquivalenceEntry, EquivalenceLibrary};
pub use error::{DefinitionMissing, TranslateError, TranslateResult};
pub use standard_equivalences::build_standard_library;
pub use synthesize_unitaries::{synthesize_unitaries as run_synthesize_unitaries, SynthesizeUnitaries};
