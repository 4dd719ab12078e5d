//! Qubit and classical bit index types.
//!
//! Indices are 1-based: the first qubit of an `N`-qubit circuit is
//! `QubitId(1)` and the last is `QubitId(N)`. The same holds for
//! classical bits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit, in `[1, qubit_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Zero-based offset of this qubit, used for bit positions and
    /// vector indexing.
    #[inline]
    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Index of a classical readout bit within a circuit, in `[1, bit_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BitId(pub u32);

impl BitId {
    /// Zero-based offset of this bit.
    #[inline]
    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for BitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

impl From<u32> for BitId {
    fn from(id: u32) -> Self {
        BitId(id)
    }
}
