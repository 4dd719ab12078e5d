//! Transpiler for orchestrating pass pipelines.

use tracing::{debug, info, instrument};

use alsvin_ir::QuantumCircuit;

use crate::connectivity::Connectivity;
use crate::error::{TranspileError, TranspileResult};
use crate::native::NativeGateSet;
use crate::pass::Pass;
use crate::passes::{
    CancelInversePairs, CastCXToCZ, CastISwapToCZ, CastSwapToCZ, CastToffoliToCX,
    CastUniversalToRzRxRz, CircuitContainsReadout, CompressSingleQubitGates, DEFAULT_ATOL,
    DecomposeControlled, ReadoutsAreFinal, ReadoutsDoNotConflict, RejectExcludedConnections,
    RejectExcludedPositions, RejectNonNative, RejectUnsupported, SimplifyRxGates, SimplifyRzGates,
    SimplifyTrivialGates, SwapQubitsForAdjacency,
};

/// Runs a sequence of passes over a circuit.
///
/// Each pass consumes the previous circuit and produces the next; the
/// first failing pass aborts the run, with the error wrapped in
/// [`TranspileError::Pass`] naming it. With the same pass list and the
/// same input, the output is identical down to every parameter bit.
pub struct Transpiler {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl Transpiler {
    /// Create a new empty transpiler.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the pipeline.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes over the given circuit.
    #[instrument(skip(self, circuit))]
    pub fn transpile(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        info!(
            "Running transpiler with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.qubit_count()
        );

        let mut current = circuit;
        for pass in &self.passes {
            debug!("Running pass: {}", pass.name());
            current = pass
                .apply(current)
                .map_err(|source| TranspileError::Pass {
                    pass: pass.name(),
                    source: Box::new(source),
                })?;
            debug!(
                "Pass {} completed, instructions: {}",
                pass.name(),
                current.len()
            );
        }

        info!(
            "Transpilation completed, instructions: {}, depth: {}",
            current.len(),
            current.depth()
        );

        Ok(current)
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the pipeline has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// The standard pipeline for a device with the given connectivity and
    /// native gate set.
    ///
    /// Front checks validate the input, then controlled structure and the
    /// named multi-qubit gates are lowered towards CZ, routing makes the
    /// pairs adjacent, and the simplification stage reduces the
    /// single-qubit remainder to named native gates. Terminal checks
    /// guarantee the result is native and legal for the device, whatever
    /// the earlier passes did.
    pub fn for_device(connectivity: Connectivity, native: NativeGateSet) -> Self {
        let mut transpiler = Self::new();
        transpiler.push_device_passes(connectivity, native);
        transpiler
    }

    /// Like [`Transpiler::for_device`], but also requires the circuit to
    /// contain at least one readout.
    pub fn for_device_with_readout(connectivity: Connectivity, native: NativeGateSet) -> Self {
        let mut transpiler = Self::new();
        transpiler.add_pass(CircuitContainsReadout);
        transpiler.push_device_passes(connectivity, native);
        transpiler
    }

    fn push_device_passes(&mut self, connectivity: Connectivity, native: NativeGateSet) {
        self.add_pass(ReadoutsDoNotConflict);
        self.add_pass(ReadoutsAreFinal);
        self.add_pass(RejectUnsupported);
        self.add_pass(DecomposeControlled);
        self.add_pass(CastToffoliToCX);
        self.add_pass(CastISwapToCZ);
        self.add_pass(CastCXToCZ);
        self.add_pass(SwapQubitsForAdjacency::new(connectivity.clone()));
        self.add_pass(CastSwapToCZ);
        self.add_pass(CancelInversePairs::new(DEFAULT_ATOL));
        self.add_pass(CompressSingleQubitGates);
        self.add_pass(CastUniversalToRzRxRz::new(DEFAULT_ATOL));
        self.add_pass(SimplifyRxGates::new(DEFAULT_ATOL));
        self.add_pass(SimplifyRzGates::new(DEFAULT_ATOL));
        self.add_pass(SimplifyTrivialGates::new(DEFAULT_ATOL));
        self.add_pass(ReadoutsAreFinal);
        self.add_pass(RejectNonNative::new(native));
        self.add_pass(RejectExcludedPositions::new(connectivity.clone()));
        self.add_pass(RejectExcludedConnections::new(connectivity));
    }
}

impl Default for Transpiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_ir::QubitId;
    use crate::pass::PassKind;

    #[test]
    fn test_empty_transpiler_is_identity() {
        let transpiler = Transpiler::new();
        assert!(transpiler.is_empty());

        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.h(QubitId(1)).unwrap().cx(QubitId(1), QubitId(2)).unwrap();
        let expected = circuit.clone();
        assert_eq!(transpiler.transpile(circuit).unwrap(), expected);
    }

    #[test]
    fn test_errors_name_the_failing_pass() {
        struct Failing;
        impl Pass for Failing {
            fn name(&self) -> &'static str {
                "Failing"
            }
            fn kind(&self) -> PassKind {
                PassKind::Check
            }
            fn apply(&self, _circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
                Err(TranspileError::MissingReadout)
            }
        }

        let mut transpiler = Transpiler::new();
        transpiler.add_pass(Failing);
        let err = transpiler
            .transpile(QuantumCircuit::with_size(1, 0))
            .unwrap_err();
        let TranspileError::Pass { pass, source } = err else {
            panic!("expected a pass-wrapped error, got {err:?}");
        };
        assert_eq!(pass, "Failing");
        assert!(matches!(*source, TranspileError::MissingReadout));
    }

    #[test]
    fn test_fail_fast_skips_later_passes() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        struct Failing;
        impl Pass for Failing {
            fn name(&self) -> &'static str {
                "Failing"
            }
            fn kind(&self) -> PassKind {
                PassKind::Check
            }
            fn apply(&self, _circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
                Err(TranspileError::MissingReadout)
            }
        }

        struct Recording(Arc<AtomicBool>);
        impl Pass for Recording {
            fn name(&self) -> &'static str {
                "Recording"
            }
            fn kind(&self) -> PassKind {
                PassKind::Check
            }
            fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
                self.0.store(true, Ordering::SeqCst);
                Ok(circuit)
            }
        }

        let ran = Arc::new(AtomicBool::new(false));
        let mut transpiler = Transpiler::new();
        transpiler.add_pass(Failing);
        transpiler.add_pass(Recording(ran.clone()));

        assert!(transpiler.transpile(QuantumCircuit::with_size(1, 0)).is_err());
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_device_preset_pass_count() {
        let transpiler = Transpiler::for_device(Connectivity::line(3), NativeGateSet::cz_device());
        assert_eq!(transpiler.len(), 19);

        let transpiler =
            Transpiler::for_device_with_readout(Connectivity::line(3), NativeGateSet::cz_device());
        assert_eq!(transpiler.len(), 20);
    }
}
