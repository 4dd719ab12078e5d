//! Error types for transpilation.

use alsvin_ir::{BitId, IrError, QubitId};
use thiserror::Error;

/// Errors that abort a `transpile` call.
///
/// All variants are terminal: the pipeline never retries, since passes
/// are deterministic and a retry would reproduce the same failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranspileError {
    /// A pass failed; carries the pass name for diagnostics.
    #[error("pass '{pass}' failed: {source}")]
    Pass {
        /// Name of the failing pass.
        pass: &'static str,
        /// The underlying error.
        #[source]
        source: Box<TranspileError>,
    },

    /// Instruction has no matrix or decomposition rule.
    #[error("instruction {index} ('{name}') has no decomposition rule")]
    UnsupportedInstruction {
        /// Position in the instruction list.
        index: usize,
        /// Name of the offending instruction.
        name: String,
    },

    /// Two readouts write the same destination bit.
    #[error("readouts at {first} and {second} both write bit {bit}")]
    ReadoutConflict {
        /// The shared destination bit.
        bit: BitId,
        /// Position of the first readout.
        first: usize,
        /// Position of the second readout.
        second: usize,
    },

    /// An instruction touches a qubit after its readout.
    #[error("instruction {index} acts on {qubit} after its readout")]
    ReadoutNotFinal {
        /// The qubit measured earlier.
        qubit: QubitId,
        /// Position of the late instruction.
        index: usize,
    },

    /// The device requires a readout and the circuit has none.
    #[error("circuit contains no readout")]
    MissingReadout,

    /// No connectivity path between two qubits.
    #[error("no path between {from} and {to} in the connectivity graph")]
    NoPath {
        /// Path start.
        from: QubitId,
        /// Path end.
        to: QubitId,
    },

    /// Instruction still outside the native set after rewriting.
    #[error("instruction {index} ('{name}') is not in the native gate set")]
    NonNativeInstruction {
        /// Position in the instruction list.
        index: usize,
        /// Name of the non-native instruction.
        name: String,
    },

    /// Instruction placed on an excluded qubit.
    #[error("instruction {index} uses excluded qubit {qubit}")]
    ExcludedPosition {
        /// Position in the instruction list.
        index: usize,
        /// The excluded qubit.
        qubit: QubitId,
    },

    /// Two-qubit instruction placed on an excluded connection.
    #[error("instruction {index} uses excluded connection {a}-{b}")]
    ExcludedConnection {
        /// Position in the instruction list.
        index: usize,
        /// First endpoint.
        a: QubitId,
        /// Second endpoint.
        b: QubitId,
    },

    /// Circuit does not fit on the target device.
    #[error("circuit needs {required} qubits but the device has {available}")]
    DeviceTooSmall {
        /// Qubits the circuit requires.
        required: u32,
        /// Qubits the device provides.
        available: u32,
    },

    /// Error from the circuit model.
    #[error(transparent)]
    Ir(#[from] IrError),
}

impl TranspileError {
    /// Strip `Pass` wrappers down to the originating error.
    pub fn root(&self) -> &TranspileError {
        match self {
            TranspileError::Pass { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for transpilation.
pub type TranspileResult<T> = Result<T, TranspileError>;
