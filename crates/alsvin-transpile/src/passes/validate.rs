//! Validation passes.
//!
//! Check passes never rewrite: they return the circuit unchanged or fail
//! with a structural error. Some run at the front of a pipeline to reject
//! malformed input early, others run last to certify the rewritten
//! circuit against the device before submission.

use rustc_hash::FxHashMap;

use alsvin_ir::{BitId, QuantumCircuit, QubitId};

use crate::connectivity::Connectivity;
use crate::error::{TranspileError, TranspileResult};
use crate::native::NativeGateSet;
use crate::pass::{Pass, PassKind};

/// Require at least one readout in the circuit.
///
/// Device-specific: hardware that only returns measured bits makes a
/// circuit without readouts pointless, so those targets prepend this
/// check.
pub struct CircuitContainsReadout;

impl Pass for CircuitContainsReadout {
    fn name(&self) -> &'static str {
        "CircuitContainsReadout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Check
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        if circuit.instructions().iter().any(|i| i.is_readout()) {
            Ok(circuit)
        } else {
            Err(TranspileError::MissingReadout)
        }
    }
}

/// Reject readouts that write the same destination bit.
pub struct ReadoutsDoNotConflict;

impl Pass for ReadoutsDoNotConflict {
    fn name(&self) -> &'static str {
        "ReadoutsDoNotConflict"
    }

    fn kind(&self) -> PassKind {
        PassKind::Check
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        let mut writers: FxHashMap<BitId, usize> = FxHashMap::default();
        for (index, instruction) in circuit.instructions().iter().enumerate() {
            if let alsvin_ir::Instruction::Readout { bit, .. } = instruction {
                if let Some(&first) = writers.get(bit) {
                    return Err(TranspileError::ReadoutConflict {
                        bit: *bit,
                        first,
                        second: index,
                    });
                }
                writers.insert(*bit, index);
            }
        }
        Ok(circuit)
    }
}

/// Reject any instruction on a qubit that was already read out.
///
/// A second readout of the same qubit counts as a late instruction too.
pub struct ReadoutsAreFinal;

impl Pass for ReadoutsAreFinal {
    fn name(&self) -> &'static str {
        "ReadoutsAreFinal"
    }

    fn kind(&self) -> PassKind {
        PassKind::Check
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        let mut measured: FxHashMap<QubitId, usize> = FxHashMap::default();
        for (index, instruction) in circuit.instructions().iter().enumerate() {
            for qubit in instruction.qubits() {
                if measured.contains_key(&qubit) {
                    return Err(TranspileError::ReadoutNotFinal { qubit, index });
                }
            }
            if let alsvin_ir::Instruction::Readout { qubit, .. } = instruction {
                measured.insert(*qubit, index);
            }
        }
        Ok(circuit)
    }
}

/// Reject gates whose matrix is undefined.
///
/// The catalog is closed, so the only way a symbol ends up without a
/// usable matrix is a non-finite parameter. A NaN angle would otherwise
/// flow silently through every decomposition.
pub struct RejectUnsupported;

impl Pass for RejectUnsupported {
    fn name(&self) -> &'static str {
        "RejectUnsupported"
    }

    fn kind(&self) -> PassKind {
        PassKind::Check
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        for (index, instruction) in circuit.instructions().iter().enumerate() {
            if let Some(symbol) = instruction.symbol() {
                if symbol.parameters().iter().any(|p| !p.is_finite()) {
                    return Err(TranspileError::UnsupportedInstruction {
                        index,
                        name: instruction.name().to_string(),
                    });
                }
            }
        }
        Ok(circuit)
    }
}

/// Terminal check: every instruction must be in the native gate set.
pub struct RejectNonNative {
    native: NativeGateSet,
}

impl RejectNonNative {
    /// Create the check for a native gate set.
    pub fn new(native: NativeGateSet) -> Self {
        Self { native }
    }
}

impl Pass for RejectNonNative {
    fn name(&self) -> &'static str {
        "RejectNonNative"
    }

    fn kind(&self) -> PassKind {
        PassKind::Check
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        for (index, instruction) in circuit.instructions().iter().enumerate() {
            if !self.native.contains_instruction(instruction) {
                return Err(TranspileError::NonNativeInstruction {
                    index,
                    name: instruction.name().to_string(),
                });
            }
        }
        Ok(circuit)
    }
}

/// Terminal check: no instruction may sit on an excluded qubit.
pub struct RejectExcludedPositions {
    connectivity: Connectivity,
}

impl RejectExcludedPositions {
    /// Create the check for a device connectivity.
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }
}

impl Pass for RejectExcludedPositions {
    fn name(&self) -> &'static str {
        "RejectExcludedPositions"
    }

    fn kind(&self) -> PassKind {
        PassKind::Check
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        for (index, instruction) in circuit.instructions().iter().enumerate() {
            for qubit in instruction.qubits() {
                if self.connectivity.is_excluded_qubit(qubit) {
                    return Err(TranspileError::ExcludedPosition { index, qubit });
                }
            }
        }
        Ok(circuit)
    }
}

/// Terminal check: no two-qubit gate may sit on an excluded edge.
pub struct RejectExcludedConnections {
    connectivity: Connectivity,
}

impl RejectExcludedConnections {
    /// Create the check for a device connectivity.
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }
}

impl Pass for RejectExcludedConnections {
    fn name(&self) -> &'static str {
        "RejectExcludedConnections"
    }

    fn kind(&self) -> PassKind {
        PassKind::Check
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        for (index, instruction) in circuit.instructions().iter().enumerate() {
            if !instruction.is_gate() {
                continue;
            }
            let qubits = instruction.qubits();
            if qubits.len() == 2 && self.connectivity.is_excluded_edge(qubits[0], qubits[1]) {
                return Err(TranspileError::ExcludedConnection {
                    index,
                    a: qubits[0],
                    b: qubits[1],
                });
            }
        }
        Ok(circuit)
    }
}
