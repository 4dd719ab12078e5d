//! Simulation errors.

use thiserror::Error;

/// Errors produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The circuit needs more qubits than the simulator accepts.
    #[error("circuit has {qubits} qubits but the simulator caps out at {max}")]
    CircuitTooLarge {
        /// Qubits the circuit declares.
        qubits: u32,
        /// Qubits the simulator accepts.
        max: u32,
    },
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
