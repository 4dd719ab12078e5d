//! Single-qubit run compression.

use rustc_hash::FxHashMap;

use alsvin_ir::{GateSymbol, Instruction, QuantumCircuit, QubitId};

use crate::error::TranspileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::one_qubit;
use crate::unitary::Unitary2x2;

/// Merge every run of single-qubit gates into one `universal` gate.
///
/// A run is a maximal stretch of bare single-qubit gates on one wire with
/// no readout or multi-qubit gate between them. The merged matrix is
/// ZYZ-decomposed and emitted as `universal(beta, alpha, gamma)` at the
/// position of the run's first gate; a run that multiplies to the
/// identity up to phase is dropped. Runs of length one count too, so
/// afterwards every bare single-qubit gate in the circuit is a
/// `universal`.
pub struct CompressSingleQubitGates;

struct Run {
    slot: usize,
    unitary: Unitary2x2,
}

impl Pass for CompressSingleQubitGates {
    fn name(&self) -> &'static str {
        "CompressSingleQubitGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        let qubit_count = circuit.qubit_count();
        let bit_count = circuit.bit_count();
        // Runs are merged into a reserved slot at their first gate, so
        // instructions on other wires keep their relative order.
        let mut slots: Vec<Option<Instruction>> = Vec::with_capacity(circuit.len());
        let mut runs: FxHashMap<QubitId, Run> = FxHashMap::default();

        for instruction in circuit.into_instructions() {
            let single = match &instruction {
                Instruction::Gate {
                    symbol,
                    targets,
                    controls,
                } if controls.is_empty() && targets.len() == 1 => {
                    Unitary2x2::from_symbol(symbol).map(|unitary| (targets[0], unitary))
                }
                _ => None,
            };
            match single {
                Some((qubit, unitary)) => match runs.get_mut(&qubit) {
                    Some(run) => run.unitary = unitary.mul(&run.unitary),
                    None => {
                        slots.push(None);
                        runs.insert(
                            qubit,
                            Run {
                                slot: slots.len() - 1,
                                unitary,
                            },
                        );
                    }
                },
                None => {
                    for qubit in instruction.qubits() {
                        if let Some(run) = runs.remove(&qubit) {
                            flush(run, qubit, &mut slots);
                        }
                    }
                    slots.push(Some(instruction));
                }
            }
        }
        for (qubit, run) in runs {
            flush(run, qubit, &mut slots);
        }

        let instructions: Vec<Instruction> = slots.into_iter().flatten().collect();
        Ok(QuantumCircuit::new(qubit_count, bit_count, instructions)?)
    }
}

fn flush(run: Run, qubit: QubitId, slots: &mut [Option<Instruction>]) {
    if run.unitary.is_identity() {
        return;
    }
    let (alpha, beta, gamma, _) = run.unitary.zyz_decomposition();
    slots[run.slot] = Some(one_qubit(GateSymbol::Universal(beta, alpha, gamma), qubit));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_ir::BitId;

    fn names(circuit: &QuantumCircuit) -> Vec<&'static str> {
        circuit.instructions().iter().map(|i| i.name()).collect()
    }

    #[test]
    fn test_run_merges_to_single_universal() {
        let mut circuit = QuantumCircuit::with_size(1, 0);
        circuit
            .h(QubitId(1))
            .unwrap()
            .x(QubitId(1))
            .unwrap()
            .z(QubitId(1))
            .unwrap()
            .pi_8(QubitId(1))
            .unwrap();
        let expected: Unitary2x2 = [
            GateSymbol::Hadamard,
            GateSymbol::SigmaX,
            GateSymbol::SigmaZ,
            GateSymbol::Pi8,
        ]
        .iter()
        .fold(Unitary2x2::identity(), |acc, symbol| {
            Unitary2x2::from_symbol(symbol).unwrap().mul(&acc)
        });

        let out = CompressSingleQubitGates.apply(circuit).unwrap();
        assert_eq!(names(&out), vec!["universal"]);
        let merged =
            Unitary2x2::from_symbol(out.instructions()[0].symbol().unwrap()).unwrap();
        // merged^dagger * expected is a phased identity iff they agree
        assert!(merged.dagger().mul(&expected).is_identity());
    }

    #[test]
    fn test_lone_gate_becomes_universal() {
        let mut circuit = QuantumCircuit::with_size(1, 0);
        circuit.h(QubitId(1)).unwrap();
        let out = CompressSingleQubitGates.apply(circuit).unwrap();
        assert_eq!(names(&out), vec!["universal"]);
    }

    #[test]
    fn test_identity_run_drops() {
        let mut circuit = QuantumCircuit::with_size(1, 0);
        circuit.h(QubitId(1)).unwrap().h(QubitId(1)).unwrap();
        let out = CompressSingleQubitGates.apply(circuit).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_two_qubit_gate_splits_runs() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit
            .h(QubitId(1))
            .unwrap()
            .cz(QubitId(1), QubitId(2))
            .unwrap()
            .x(QubitId(1))
            .unwrap();
        let out = CompressSingleQubitGates.apply(circuit).unwrap();
        assert_eq!(names(&out), vec!["universal", "control_z", "universal"]);
    }

    #[test]
    fn test_readout_splits_runs() {
        let mut circuit = QuantumCircuit::with_size(1, 1);
        circuit
            .h(QubitId(1))
            .unwrap()
            .readout(QubitId(1), BitId(1))
            .unwrap();
        let out = CompressSingleQubitGates.apply(circuit).unwrap();
        assert_eq!(names(&out), vec!["universal", "readout"]);
    }

    #[test]
    fn test_merged_gate_lands_on_first_position() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit
            .h(QubitId(1))
            .unwrap()
            .x(QubitId(2))
            .unwrap()
            .x(QubitId(1))
            .unwrap();
        let out = CompressSingleQubitGates.apply(circuit).unwrap();
        assert_eq!(names(&out), vec!["universal", "universal"]);
        assert_eq!(out.instructions()[0].qubits(), vec![QubitId(1)]);
        assert_eq!(out.instructions()[1].qubits(), vec![QubitId(2)]);
    }
}
