//! Alsvin Transpilation Framework
//!
//! This crate rewrites circuits built from the [`alsvin_ir`] catalog until
//! they fit a target device: only native gates, only adjacent two-qubit
//! pairs, and none of the excluded wires. It implements a pass-based
//! architecture where every pass is a pure circuit-to-circuit function and
//! a pipeline is just a pass list folded over the input.
//!
//! # Overview
//!
//! The standard device pipeline transforms an input circuit in four
//! stages:
//! 1. **Validation**: Readout and instruction well-formedness checks
//! 2. **Decomposition**: Lower `controlled` wraps and the named
//!    multi-qubit gates towards CZ
//! 3. **Routing**: Insert swaps so every pair gate acts on adjacent wires
//! 4. **Simplification**: Merge, rename and drop single-qubit gates until
//!    only native symbols remain
//!
//! Terminal checks then prove the result native and legal, whatever the
//! rewrite stages did.
//!
//! # Example: Transpiling for a linear device
//!
//! ```rust
//! use alsvin_ir::QuantumCircuit;
//! use alsvin_transpile::{Connectivity, NativeGateSet, Transpiler};
//!
//! let circuit = QuantumCircuit::bell().unwrap();
//!
//! let transpiler = Transpiler::for_device(
//!     Connectivity::line(2),
//!     NativeGateSet::cz_device(),
//! );
//! let compiled = transpiler.transpile(circuit).unwrap();
//!
//! // The entangler is now the native CZ
//! assert!(compiled.instructions().iter().all(|i| i.name() != "control_x"));
//! ```
//!
//! # Built-in passes
//!
//! ## Validation passes
//! - [`passes::CircuitContainsReadout`], [`passes::ReadoutsDoNotConflict`],
//!   [`passes::ReadoutsAreFinal`]: readout discipline
//! - [`passes::RejectUnsupported`], [`passes::RejectNonNative`]: catalog
//!   and native-set membership
//! - [`passes::RejectExcludedPositions`],
//!   [`passes::RejectExcludedConnections`]: device exclusion zones
//!
//! ## Decomposition passes
//! - [`passes::DecomposeControlled`]: multi-controlled gates to named
//!   gates via ABC conjugation and square-root recursion
//! - [`passes::CastToffoliToCX`], [`passes::CastCXToCZ`],
//!   [`passes::CastISwapToCZ`], [`passes::CastSwapToCZ`]: exact
//!   multi-qubit factorizations
//!
//! ## Routing passes
//! - [`passes::SwapQubitsForAdjacency`]: shortest-path swap insertion
//!
//! ## Simplification passes
//! - [`passes::CancelInversePairs`]: adjacent inverse-pair removal
//! - [`passes::CompressSingleQubitGates`]: single-qubit runs to one
//!   `universal` via ZYZ decomposition
//! - [`passes::CastUniversalToRzRxRz`], [`passes::SimplifyRxGates`],
//!   [`passes::SimplifyRzGates`], [`passes::SimplifyTrivialGates`]:
//!   axial rewriting down to named native gates
//!
//! # Custom passes
//!
//! Implement the [`Pass`] trait to add a pass to a pipeline:
//!
//! ```rust
//! use alsvin_ir::QuantumCircuit;
//! use alsvin_transpile::{Pass, PassKind, TranspileResult, Transpiler};
//!
//! struct CountGates;
//!
//! impl Pass for CountGates {
//!     fn name(&self) -> &'static str { "CountGates" }
//!     fn kind(&self) -> PassKind { PassKind::Check }
//!
//!     fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
//!         println!("{} gates", circuit.gate_count());
//!         Ok(circuit)
//!     }
//! }
//!
//! let mut transpiler = Transpiler::new();
//! transpiler.add_pass(CountGates);
//! ```

pub mod connectivity;
pub mod error;
pub mod native;
pub mod pass;
pub mod transpiler;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use connectivity::Connectivity;
pub use error::{TranspileError, TranspileResult};
pub use native::NativeGateSet;
pub use pass::{Pass, PassKind};
pub use passes::DEFAULT_ATOL;
pub use transpiler::Transpiler;
pub use unitary::Unitary2x2;
