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

use serde::{Deserialize, Serialize};

/// Index of a qubit wire within a circuit's quantum register.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qubit(pub u32);

/// Index of a classical bit wire within a circuit's classical register.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Clbit(pub u32);

impl Qubit {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Clbit {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Qubit {
    fn from(value: u32) -> Self {
        Qubit(value)
    }
}

impl From<u32> for Clbit {
    fn from(value: u32) -> Self {
        Clbit(value)
    }
}
