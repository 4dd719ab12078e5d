//! Error types for the circuit model.

use crate::qubit::{BitId, QubitId};
use thiserror::Error;

/// Errors that can occur while constructing circuits and instructions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the declared qubit count.
    #[error("Qubit {qubit} out of range for a {qubit_count}-qubit circuit")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: QubitId,
        /// Number of qubits in the circuit.
        qubit_count: u32,
    },

    /// Bit index outside the declared bit count.
    #[error("Bit {bit} out of range for a circuit with {bit_count} bits")]
    BitOutOfRange {
        /// The offending bit index.
        bit: BitId,
        /// Number of classical bits in the circuit.
        bit_count: u32,
    },

    /// Gate applied to the wrong number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Same qubit used more than once by one instruction.
    #[error("Duplicate qubit {qubit} in '{gate_name}'")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate_name: String,
    },

    /// Controlled wrap given the wrong number of control qubits.
    #[error("Controlled '{gate_name}' declares {expected} controls, got {got}")]
    ControlCountMismatch {
        /// Name of the kernel gate.
        gate_name: String,
        /// Number of controls declared by the symbol.
        expected: u32,
        /// Number of control qubits provided.
        got: u32,
    },
}

/// Result type for circuit-model operations.
pub type IrResult<T> = Result<T, IrError>;
