//! Built-in transpilation passes.
//!
//! Passes are organized by role:
//! - [`validate`]: checks that accept or reject a circuit unchanged
//! - [`decompose`]: table-driven gate lowering toward the native set
//! - [`route`]: placement and SWAP insertion for connectivity
//! - [`simplify`]: cancellation and special-angle rewrites
//! - [`compress`]: single-qubit run merging

pub mod compress;
pub mod decompose;
pub mod route;
pub mod simplify;
pub mod validate;

pub use compress::CompressSingleQubitGates;
pub use decompose::{
    CastCXToCZ, CastISwapToCZ, CastSwapToCZ, CastToffoliToCX, DecomposeControlled,
};
pub use route::{Placement, SwapQubitsForAdjacency};
pub use simplify::{
    CancelInversePairs, CastUniversalToRzRxRz, DEFAULT_ATOL, SimplifyRxGates, SimplifyRzGates,
    SimplifyTrivialGates,
};
pub use validate::{
    CircuitContainsReadout, ReadoutsAreFinal, ReadoutsDoNotConflict, RejectExcludedConnections,
    RejectExcludedPositions, RejectNonNative, RejectUnsupported,
};

use alsvin_ir::{GateSymbol, Instruction, QuantumCircuit, QubitId};

use crate::error::TranspileResult;

/// Rebuild a circuit by mapping every instruction to a replacement list.
///
/// The flat-list analogue of rebuilding a dataflow graph from scratch:
/// replacements land at the original instruction's position, so program
/// order is preserved by construction. The rebuilt circuit re-checks all
/// index ranges.
pub(crate) fn rewrite_instructions<F>(
    circuit: QuantumCircuit,
    mut rewrite: F,
) -> TranspileResult<QuantumCircuit>
where
    F: FnMut(usize, Instruction) -> TranspileResult<Vec<Instruction>>,
{
    let qubit_count = circuit.qubit_count();
    let bit_count = circuit.bit_count();
    let mut out = Vec::with_capacity(circuit.len());
    for (index, instruction) in circuit.into_instructions().into_iter().enumerate() {
        out.extend(rewrite(index, instruction)?);
    }
    Ok(QuantumCircuit::new(qubit_count, bit_count, out)?)
}

/// Build a one-qubit gate instruction without re-validating arity.
pub(crate) fn one_qubit(symbol: GateSymbol, qubit: QubitId) -> Instruction {
    Instruction::Gate {
        symbol,
        targets: vec![qubit],
        controls: vec![],
    }
}

/// Build a two-qubit gate instruction without re-validating arity.
pub(crate) fn two_qubit(symbol: GateSymbol, a: QubitId, b: QubitId) -> Instruction {
    Instruction::Gate {
        symbol,
        targets: vec![a, b],
        controls: vec![],
    }
}

/// Build a three-qubit gate instruction without re-validating arity.
pub(crate) fn three_qubit(symbol: GateSymbol, a: QubitId, b: QubitId, c: QubitId) -> Instruction {
    Instruction::Gate {
        symbol,
        targets: vec![a, b, c],
        controls: vec![],
    }
}
