//! Pass trait and types for transpilation passes.

use alsvin_ir::QuantumCircuit;

use crate::error::TranspileResult;

/// The kind of transpilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Check pass that validates the circuit and returns it unchanged.
    Check,
    /// Rewrite pass that returns a transformed circuit.
    Rewrite,
}

/// A transpilation pass.
///
/// Passes are the unit of composition in Alsvin. Each takes a circuit by
/// value and produces a new one, so a failed pipeline never leaves a
/// half-rewritten circuit behind. A pass must be deterministic: equal
/// input circuits produce byte-identical output circuits.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &'static str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass.
    ///
    /// Check passes return the input untouched or fail. Rewrite passes
    /// return a circuit with the same observable semantics.
    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit>;
}
