//! Alsvin circuit model and instruction catalog.
//!
//! This crate provides the data structures the Alsvin transpiler rewrites:
//! gate symbols with exact matrix semantics, instructions, and the ordered
//! circuit value they compose into.
//!
//! # Core components
//!
//! - **Indices**: [`QubitId`], [`BitId`] for 1-based addressing of the
//!   quantum and classical registers
//! - **Catalog**: [`GateSymbol`], the closed set of gate variants, each
//!   with matrix generator, arity, parameters and exact inverse
//! - **Instructions**: [`Instruction`] combining a gate with its operands,
//!   or a readout
//! - **Circuit**: [`QuantumCircuit`] holding qubit/bit counts plus
//!   instructions in program order, with a fluent builder API
//! - **Export**: [`FlatInstruction`], the flattened tuple form handed to
//!   execution clients
//!
//! # Example: building a Bell state
//!
//! ```rust
//! use alsvin_ir::{QuantumCircuit, QubitId, BitId};
//!
//! let mut circuit = QuantumCircuit::with_size(2, 2);
//! circuit.h(QubitId(1)).unwrap();
//! circuit.cx(QubitId(1), QubitId(2)).unwrap();
//! circuit.readout(QubitId(1), BitId(1)).unwrap();
//! circuit.readout(QubitId(2), BitId(2)).unwrap();
//!
//! assert_eq!(circuit.qubit_count(), 2);
//! assert_eq!(circuit.gate_count(), 2);
//! ```
//!
//! Circuits are value-like: the transpiler never mutates a circuit it was
//! given, it produces a new one. Indices are checked on every push, so an
//! instruction can never reference a qubit or bit outside the declared
//! register sizes.

pub mod circuit;
pub mod error;
pub mod export;
pub mod gate;
pub mod instruction;
pub mod operator;
pub mod qubit;

pub use circuit::QuantumCircuit;
pub use error::{IrError, IrResult};
pub use export::{FlatInstruction, flat_instructions, to_json};
pub use gate::GateSymbol;
pub use instruction::Instruction;
pub use operator::Operator;
pub use qubit::{BitId, QubitId};
