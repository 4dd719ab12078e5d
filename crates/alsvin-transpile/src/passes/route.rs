//! Qubit routing for constrained connectivity.

use alsvin_ir::{GateSymbol, Instruction, QuantumCircuit, QubitId};

use crate::connectivity::Connectivity;
use crate::error::{TranspileError, TranspileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::two_qubit;

/// A bijection between logical circuit qubits and physical device wires.
///
/// Starts out as the identity and is updated whenever the router inserts
/// a swap, so that later instructions are remapped through the current
/// wire assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    to_physical: Vec<QubitId>,
    to_logical: Vec<QubitId>,
}

impl Placement {
    /// The identity placement over `qubit_count` wires.
    pub fn identity(qubit_count: u32) -> Self {
        let wires: Vec<QubitId> = (1..=qubit_count).map(QubitId).collect();
        Placement {
            to_physical: wires.clone(),
            to_logical: wires,
        }
    }

    /// The physical wire currently holding `logical`.
    pub fn physical(&self, logical: QubitId) -> QubitId {
        self.to_physical[logical.offset()]
    }

    /// The logical qubit currently held by `physical`.
    pub fn logical(&self, physical: QubitId) -> QubitId {
        self.to_logical[physical.offset()]
    }

    /// Record a swap of the logical contents of two physical wires.
    pub fn swap(&mut self, a: QubitId, b: QubitId) {
        let logical_a = self.logical(a);
        let logical_b = self.logical(b);
        self.to_physical[logical_a.offset()] = b;
        self.to_physical[logical_b.offset()] = a;
        self.to_logical.swap(a.offset(), b.offset());
    }
}

/// Make every two-qubit gate act on adjacent wires by inserting swaps.
///
/// Operands are remapped through a [`Placement`] that starts as the
/// identity. When a pair is not adjacent, the first operand is walked
/// along a shortest path until one hop remains, one inserted swap per
/// hop. The routed circuit is widened to the highest physical wire it
/// touches, so detours through spare device qubits stay in range.
///
/// Gates on three or more qubits are rejected; decomposition has to run
/// first.
pub struct SwapQubitsForAdjacency {
    connectivity: Connectivity,
}

impl SwapQubitsForAdjacency {
    pub fn new(connectivity: Connectivity) -> Self {
        SwapQubitsForAdjacency { connectivity }
    }
}

impl Pass for SwapQubitsForAdjacency {
    fn name(&self) -> &'static str {
        "SwapQubitsForAdjacency"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        let required = circuit.qubit_count();
        let available = self.connectivity.qubit_count();
        if required > available {
            return Err(TranspileError::DeviceTooSmall {
                required,
                available,
            });
        }

        let bit_count = circuit.bit_count();
        let mut placement = Placement::identity(available);
        let mut out: Vec<Instruction> = Vec::with_capacity(circuit.len());

        for (index, instruction) in circuit.into_instructions().into_iter().enumerate() {
            match instruction {
                Instruction::Readout { qubit, bit } => {
                    out.push(Instruction::Readout {
                        qubit: placement.physical(qubit),
                        bit,
                    });
                }
                Instruction::Gate {
                    symbol,
                    targets,
                    controls,
                } => {
                    let targets: Vec<QubitId> =
                        targets.iter().map(|&q| placement.physical(q)).collect();
                    let controls: Vec<QubitId> =
                        controls.iter().map(|&q| placement.physical(q)).collect();

                    // Two-qubit shapes: a named pair gate, or a kernel
                    // under a single control.
                    let pair = match (controls.as_slice(), targets.as_slice()) {
                        (&[], &[a, b]) => Some((a, b)),
                        (&[c], &[t]) => Some((c, t)),
                        _ => None,
                    };
                    match pair {
                        Some((a, b)) => {
                            let moved =
                                self.route_pair(&mut placement, &mut out, a, b)?;
                            if controls.is_empty() {
                                out.push(Instruction::Gate {
                                    symbol,
                                    targets: vec![moved, b],
                                    controls,
                                });
                            } else {
                                out.push(Instruction::Gate {
                                    symbol,
                                    targets,
                                    controls: vec![moved],
                                });
                            }
                        }
                        None if controls.len() + targets.len() <= 1 => {
                            out.push(Instruction::Gate {
                                symbol,
                                targets,
                                controls,
                            });
                        }
                        None => {
                            return Err(TranspileError::UnsupportedInstruction {
                                index,
                                name: symbol.name().to_string(),
                            });
                        }
                    }
                }
            }
        }

        let mut qubit_count = required;
        for instruction in &out {
            for qubit in instruction.qubits() {
                qubit_count = qubit_count.max(qubit.0);
            }
        }
        Ok(QuantumCircuit::new(qubit_count, bit_count, out)?)
    }
}

impl SwapQubitsForAdjacency {
    /// Bring `a` next to `b`, returning the wire `a`'s payload ends on.
    ///
    /// The swaps never touch `b`, so the caller's second operand stays
    /// valid.
    fn route_pair(
        &self,
        placement: &mut Placement,
        out: &mut Vec<Instruction>,
        a: QubitId,
        b: QubitId,
    ) -> TranspileResult<QubitId> {
        if self.connectivity.are_adjacent(a, b) {
            return Ok(a);
        }
        let path = self.connectivity.shortest_path(a, b)?;
        for pair in path.windows(2).take(path.len() - 2) {
            out.push(two_qubit(GateSymbol::Swap, pair[0], pair[1]));
            placement.swap(pair[0], pair[1]);
        }
        Ok(path[path.len() - 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_ir::BitId;

    fn names(circuit: &QuantumCircuit) -> Vec<&'static str> {
        circuit.instructions().iter().map(|i| i.name()).collect()
    }

    #[test]
    fn test_placement_tracks_swaps() {
        let mut placement = Placement::identity(3);
        assert_eq!(placement.physical(QubitId(2)), QubitId(2));

        placement.swap(QubitId(1), QubitId(2));
        assert_eq!(placement.physical(QubitId(1)), QubitId(2));
        assert_eq!(placement.physical(QubitId(2)), QubitId(1));
        assert_eq!(placement.logical(QubitId(1)), QubitId(2));

        placement.swap(QubitId(2), QubitId(3));
        assert_eq!(placement.physical(QubitId(1)), QubitId(3));
        assert_eq!(placement.physical(QubitId(3)), QubitId(2));
    }

    #[test]
    fn test_adjacent_gates_untouched() {
        let mut circuit = QuantumCircuit::with_size(3, 0);
        circuit
            .h(QubitId(1))
            .unwrap()
            .cx(QubitId(1), QubitId(2))
            .unwrap()
            .cz(QubitId(2), QubitId(3))
            .unwrap();
        let expected = circuit.clone();

        let pass = SwapQubitsForAdjacency::new(Connectivity::line(3));
        assert_eq!(pass.apply(circuit).unwrap(), expected);
    }

    #[test]
    fn test_distant_pair_gets_swapped() {
        let mut circuit = QuantumCircuit::with_size(3, 0);
        circuit.cx(QubitId(1), QubitId(3)).unwrap();

        let pass = SwapQubitsForAdjacency::new(Connectivity::line(3));
        let out = pass.apply(circuit).unwrap();

        assert_eq!(names(&out), vec!["swap", "control_x"]);
        assert_eq!(out.instructions()[0].qubits(), vec![QubitId(1), QubitId(2)]);
        assert_eq!(out.instructions()[1].qubits(), vec![QubitId(2), QubitId(3)]);
    }

    #[test]
    fn test_later_instructions_follow_the_placement() {
        let mut circuit = QuantumCircuit::with_size(3, 1);
        circuit
            .cx(QubitId(1), QubitId(3))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .readout(QubitId(1), BitId(1))
            .unwrap();

        let pass = SwapQubitsForAdjacency::new(Connectivity::line(3));
        let out = pass.apply(circuit).unwrap();

        // Logical 1 now lives on wire 2, so the tail follows it there.
        assert_eq!(names(&out), vec!["swap", "control_x", "hadamard", "readout"]);
        assert_eq!(out.instructions()[2].qubits(), vec![QubitId(2)]);
        assert_eq!(out.instructions()[3].qubits(), vec![QubitId(2)]);
    }

    #[test]
    fn test_excluded_edge_forces_detour() {
        let connectivity = Connectivity::custom(4, &[(1, 2), (2, 3), (3, 4), (4, 1)])
            .with_excluded_edges([(1, 2)]);
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.cz(QubitId(1), QubitId(2)).unwrap();

        let out = SwapQubitsForAdjacency::new(connectivity)
            .apply(circuit)
            .unwrap();

        // Path around the ring is 1-4-3-2.
        assert_eq!(names(&out), vec!["swap", "swap", "control_z"]);
        assert_eq!(out.instructions()[0].qubits(), vec![QubitId(1), QubitId(4)]);
        assert_eq!(out.instructions()[1].qubits(), vec![QubitId(4), QubitId(3)]);
        assert_eq!(out.instructions()[2].qubits(), vec![QubitId(3), QubitId(2)]);
        assert_eq!(out.qubit_count(), 4);
    }

    #[test]
    fn test_routed_circuit_widens_to_spare_wires() {
        let connectivity = Connectivity::custom(4, &[(1, 4), (4, 2)]);
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.cx(QubitId(1), QubitId(2)).unwrap();

        let out = SwapQubitsForAdjacency::new(connectivity)
            .apply(circuit)
            .unwrap();

        assert_eq!(names(&out), vec!["swap", "control_x"]);
        assert_eq!(out.qubit_count(), 4);
    }

    #[test]
    fn test_device_too_small() {
        let circuit = QuantumCircuit::with_size(3, 0);
        let err = SwapQubitsForAdjacency::new(Connectivity::line(2))
            .apply(circuit)
            .unwrap_err();
        assert!(matches!(
            err,
            TranspileError::DeviceTooSmall {
                required: 3,
                available: 2,
            }
        ));
    }

    #[test]
    fn test_disconnected_pair_has_no_path() {
        let connectivity = Connectivity::custom(4, &[(1, 2), (3, 4)]);
        let mut circuit = QuantumCircuit::with_size(4, 0);
        circuit.cz(QubitId(1), QubitId(3)).unwrap();

        let err = SwapQubitsForAdjacency::new(connectivity)
            .apply(circuit)
            .unwrap_err();
        assert!(matches!(
            err,
            TranspileError::NoPath {
                from: QubitId(1),
                to: QubitId(3),
            }
        ));
    }

    #[test]
    fn test_wide_gates_are_rejected() {
        let mut circuit = QuantumCircuit::with_size(3, 0);
        circuit
            .toffoli(QubitId(1), QubitId(2), QubitId(3))
            .unwrap();

        let err = SwapQubitsForAdjacency::new(Connectivity::line(3))
            .apply(circuit)
            .unwrap_err();
        assert!(matches!(
            err,
            TranspileError::UnsupportedInstruction { index: 0, .. }
        ));
    }
}
