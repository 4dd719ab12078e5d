//! Synchronous circuit simulation.

use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use alsvin_ir::{Instruction, QuantumCircuit, QubitId};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Statevector simulator for whole circuits.
///
/// The simulator evolves the statevector through every gate, then reads
/// the classical register off the final state: each readout copies its
/// qubit's sampled value into its bit. Circuits are expected to keep
/// readouts after the gates that feed them.
#[derive(Debug, Clone)]
pub struct Simulator {
    /// Maximum number of qubits accepted.
    max_qubits: u32,
}

impl Simulator {
    /// Create a simulator with the default qubit cap.
    pub fn new() -> Self {
        Self { max_qubits: 20 }
    }

    /// Create a simulator with a custom qubit cap.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self { max_qubits }
    }

    /// Evolve the full statevector of `circuit`.
    #[instrument(skip(self, circuit))]
    pub fn statevector(&self, circuit: &QuantumCircuit) -> SimResult<Statevector> {
        if circuit.qubit_count() > self.max_qubits {
            return Err(SimError::CircuitTooLarge {
                qubits: circuit.qubit_count(),
                max: self.max_qubits,
            });
        }
        debug!(
            "Simulating {} instructions on {} qubits",
            circuit.len(),
            circuit.qubit_count()
        );
        let mut state = Statevector::new(circuit.qubit_count());
        for instruction in circuit.instructions() {
            state.apply(instruction);
        }
        Ok(state)
    }

    /// Exact probability of each classical bitstring.
    ///
    /// Bitstrings list bit 1 first; bits no readout writes stay `0`.
    /// Basis states that land on the same bitstring pool their weight.
    pub fn distribution(&self, circuit: &QuantumCircuit) -> SimResult<FxHashMap<String, f64>> {
        let state = self.statevector(circuit)?;
        let sources = readout_sources(circuit);
        let mut distribution = FxHashMap::default();
        for outcome in 0..state.amplitudes().len() {
            let probability = state.probability(outcome);
            if probability > 0.0 {
                *distribution
                    .entry(register_bits(outcome, &sources))
                    .or_insert(0.0) += probability;
            }
        }
        Ok(distribution)
    }

    /// Sampled histogram of classical bitstrings.
    #[instrument(skip(self, circuit, rng))]
    pub fn counts(
        &self,
        circuit: &QuantumCircuit,
        shots: u64,
        rng: &mut impl Rng,
    ) -> SimResult<FxHashMap<String, u64>> {
        let state = self.statevector(circuit)?;
        let sources = readout_sources(circuit);
        let mut counts = FxHashMap::default();
        for _ in 0..shots {
            let outcome = state.sample(rng);
            *counts
                .entry(register_bits(outcome, &sources))
                .or_insert(0) += 1;
        }
        Ok(counts)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Map each classical bit to the qubit its readout copies, if any.
///
/// A later readout into the same bit wins, matching register order.
fn readout_sources(circuit: &QuantumCircuit) -> Vec<Option<QubitId>> {
    let mut sources = vec![None; circuit.bit_count() as usize];
    for instruction in circuit.instructions() {
        if let Instruction::Readout { qubit, bit } = instruction {
            sources[bit.offset()] = Some(*qubit);
        }
    }
    sources
}

/// Render the classical register for one sampled outcome, bit 1 first.
fn register_bits(outcome: usize, sources: &[Option<QubitId>]) -> String {
    sources
        .iter()
        .map(|source| match source {
            Some(qubit) if outcome & (1 << qubit.offset()) != 0 => '1',
            _ => '0',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_ir::{BitId, QuantumCircuit};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bell_counts_land_on_the_diagonal() {
        let simulator = Simulator::new();
        let mut rng = StdRng::seed_from_u64(11);
        let counts = simulator
            .counts(&QuantumCircuit::bell().unwrap(), 500, &mut rng)
            .unwrap();
        let zeros = counts.get("00").copied().unwrap_or(0);
        let ones = counts.get("11").copied().unwrap_or(0);
        assert_eq!(zeros + ones, 500);
        assert!(zeros > 0);
        assert!(ones > 0);
    }

    #[test]
    fn test_bell_distribution_is_exact() {
        let distribution = Simulator::new()
            .distribution(&QuantumCircuit::bell().unwrap())
            .unwrap();
        assert_eq!(distribution.len(), 2);
        assert!((distribution["00"] - 0.5).abs() < 1e-10);
        assert!((distribution["11"] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_ghz_distribution_has_two_peaks() {
        let distribution = Simulator::new()
            .distribution(&QuantumCircuit::ghz(3).unwrap())
            .unwrap();
        assert_eq!(distribution.len(), 2);
        assert!((distribution["000"] - 0.5).abs() < 1e-10);
        assert!((distribution["111"] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_unread_bits_stay_zero() {
        let mut circuit = QuantumCircuit::with_size(1, 2);
        circuit.x(QubitId(1)).unwrap();
        circuit.readout(QubitId(1), BitId(2)).unwrap();
        let distribution = Simulator::new().distribution(&circuit).unwrap();
        assert!((distribution["01"] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_oversized_circuits_are_rejected() {
        let circuit = QuantumCircuit::with_size(6, 0);
        let result = Simulator::with_max_qubits(5).statevector(&circuit);
        assert!(matches!(result, Err(SimError::CircuitTooLarge { .. })));
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let simulator = Simulator::new();
        let circuit = QuantumCircuit::bell().unwrap();
        let mut first_rng = StdRng::seed_from_u64(3);
        let mut second_rng = StdRng::seed_from_u64(3);
        let first = simulator.counts(&circuit, 200, &mut first_rng).unwrap();
        let second = simulator.counts(&circuit, 200, &mut second_rng).unwrap();
        assert_eq!(first, second);
    }
}
