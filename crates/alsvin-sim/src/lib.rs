//! Alsvin local statevector simulator.
//!
//! This crate runs [`alsvin_ir`] circuits on an exact statevector,
//! mainly to check that transpiled circuits still do what the input
//! did. It is synchronous and keeps the full state in memory, which is
//! practical up to roughly 20 qubits.
//!
//! # Example
//!
//! ```
//! use alsvin_ir::QuantumCircuit;
//! use alsvin_sim::Simulator;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let circuit = QuantumCircuit::bell()?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let counts = Simulator::new().counts(&circuit, 1000, &mut rng)?;
//!
//! // A Bell pair reads out only 00 and 11.
//! assert_eq!(counts.values().sum::<u64>(), 1000);
//! assert_eq!(counts.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod simulator;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use simulator::Simulator;
pub use statevector::Statevector;
