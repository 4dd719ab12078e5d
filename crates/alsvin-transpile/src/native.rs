//! Native gate sets.

use serde::{Deserialize, Serialize};

use alsvin_ir::{GateSymbol, Instruction};

/// The set of instruction names a device executes directly.
///
/// Membership is by name, so `phase_shift` covers every angle. Readout
/// availability is part of the set as well; a set without `readout`
/// describes a device that cannot measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeGateSet {
    /// Instruction names in the set.
    gates: Vec<String>,
}

impl NativeGateSet {
    /// Create a native gate set from instruction names.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            gates: gates.into_iter().map(std::convert::Into::into).collect(),
        }
    }

    /// Check if an instruction name is in the set.
    ///
    /// Linear search; native sets stay small enough that a hash set
    /// would not pay for itself.
    pub fn contains(&self, name: &str) -> bool {
        self.gates.iter().any(|g| g == name)
    }

    /// Check if a gate symbol is in the set.
    pub fn contains_symbol(&self, symbol: &GateSymbol) -> bool {
        self.contains(symbol.name())
    }

    /// Check if an instruction is in the set.
    pub fn contains_instruction(&self, instruction: &Instruction) -> bool {
        self.contains(instruction.name())
    }

    /// Get the instruction names.
    pub fn gates(&self) -> &[String] {
        &self.gates
    }

    /// Native set of a CZ-coupled fixed-frequency device: discrete
    /// single-qubit gates, arbitrary Z-axis phases, CZ and readout.
    pub fn cz_device() -> Self {
        Self::new([
            "identity",
            "sigma_x",
            "sigma_y",
            "sigma_z",
            "phase_shift",
            "pi_8",
            "pi_8_dagger",
            "x_90",
            "x_minus_90",
            "y_90",
            "y_minus_90",
            "z_90",
            "z_minus_90",
            "control_z",
            "readout",
        ])
    }

    /// Every catalog instruction, for targets without hardware limits.
    pub fn universal() -> Self {
        Self::new([
            "identity",
            "sigma_x",
            "sigma_y",
            "sigma_z",
            "hadamard",
            "phase_shift",
            "pi_8",
            "pi_8_dagger",
            "x_90",
            "x_minus_90",
            "y_90",
            "y_minus_90",
            "z_90",
            "z_minus_90",
            "rotation",
            "rotation_x",
            "rotation_y",
            "rotation_z",
            "universal",
            "swap",
            "iswap",
            "iswap_dagger",
            "control_x",
            "control_z",
            "toffoli",
            "controlled",
            "readout",
        ])
    }
}
