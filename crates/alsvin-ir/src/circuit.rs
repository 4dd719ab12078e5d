//! The quantum circuit value and its builder API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::GateSymbol;
use crate::instruction::Instruction;
use crate::qubit::{BitId, QubitId};

/// An ordered sequence of instructions over a fixed register of qubits
/// and classical bits.
///
/// Circuits are value-like: transpiler passes consume a circuit and
/// return a new one, so a built circuit is never mutated behind the
/// caller's back. Qubit indices run in `[1, qubit_count]` and bit
/// indices in `[1, bit_count]`; both are checked on every push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumCircuit {
    /// Number of qubits.
    qubit_count: u32,
    /// Number of classical readout bits.
    bit_count: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl QuantumCircuit {
    /// Create an empty circuit with the given register sizes.
    pub fn with_size(qubit_count: u32, bit_count: u32) -> Self {
        Self {
            qubit_count,
            bit_count,
            instructions: vec![],
        }
    }

    /// Create a circuit from a prebuilt instruction list, checking every
    /// index against the declared counts.
    pub fn new(
        qubit_count: u32,
        bit_count: u32,
        instructions: Vec<Instruction>,
    ) -> IrResult<Self> {
        let mut circuit = Self::with_size(qubit_count, bit_count);
        for instruction in instructions {
            circuit.push(instruction)?;
        }
        Ok(circuit)
    }

    /// Append an instruction, checking qubit and bit ranges.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        for qubit in instruction.qubits() {
            if qubit.0 < 1 || qubit.0 > self.qubit_count {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    qubit_count: self.qubit_count,
                });
            }
        }
        if let Instruction::Readout { bit, .. } = &instruction {
            if bit.0 < 1 || bit.0 > self.bit_count {
                return Err(IrError::BitOutOfRange {
                    bit: *bit,
                    bit_count: self.bit_count,
                });
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply the identity gate.
    pub fn identity(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::Identity, vec![qubit])?)
    }

    /// Apply the Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::SigmaX, vec![qubit])?)
    }

    /// Apply the Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::SigmaY, vec![qubit])?)
    }

    /// Apply the Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::SigmaZ, vec![qubit])?)
    }

    /// Apply the Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::Hadamard, vec![qubit])?)
    }

    /// Apply a phase shift.
    pub fn phase_shift(&mut self, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::PhaseShift(phi), vec![qubit])?)
    }

    /// Apply the pi/8 gate.
    pub fn pi_8(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::Pi8, vec![qubit])?)
    }

    /// Apply the adjoint pi/8 gate.
    pub fn pi_8_dagger(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::Pi8Dagger, vec![qubit])?)
    }

    /// Apply a +90 degree X rotation.
    pub fn x_90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::X90, vec![qubit])?)
    }

    /// Apply a -90 degree X rotation.
    pub fn x_minus_90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::XMinus90, vec![qubit])?)
    }

    /// Apply a +90 degree Y rotation.
    pub fn y_90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::Y90, vec![qubit])?)
    }

    /// Apply a -90 degree Y rotation.
    pub fn y_minus_90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::YMinus90, vec![qubit])?)
    }

    /// Apply a +90 degree Z rotation.
    pub fn z_90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::Z90, vec![qubit])?)
    }

    /// Apply a -90 degree Z rotation.
    pub fn z_minus_90(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::ZMinus90, vec![qubit])?)
    }

    /// Apply a rotation about an axis in the XY plane.
    pub fn rotation(&mut self, theta: f64, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(
            GateSymbol::Rotation(theta, phi),
            vec![qubit],
        )?)
    }

    /// Apply an X rotation.
    pub fn rotation_x(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::RotationX(theta), vec![qubit])?)
    }

    /// Apply a Y rotation.
    pub fn rotation_y(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::RotationY(theta), vec![qubit])?)
    }

    /// Apply a Z rotation.
    pub fn rotation_z(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::RotationZ(theta), vec![qubit])?)
    }

    /// Apply the universal gate `U(theta, phi, lambda)`.
    pub fn universal(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(
            GateSymbol::Universal(theta, phi, lambda),
            vec![qubit],
        )?)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply a SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::Swap, vec![q1, q2])?)
    }

    /// Apply an iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::ISwap, vec![q1, q2])?)
    }

    /// Apply the adjoint iSWAP gate.
    pub fn iswap_dagger(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(GateSymbol::ISwapDagger, vec![q1, q2])?)
    }

    /// Apply a controlled-X gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(
            GateSymbol::ControlX,
            vec![control, target],
        )?)
    }

    /// Apply a controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(
            GateSymbol::ControlZ,
            vec![control, target],
        )?)
    }

    /// Apply a Toffoli gate.
    pub fn toffoli(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(
            GateSymbol::Toffoli,
            vec![c1, c2, target],
        )?)
    }

    /// Apply an arbitrary controlled wrap of a kernel gate.
    pub fn controlled(
        &mut self,
        kernel: GateSymbol,
        controls: Vec<QubitId>,
        targets: Vec<QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::controlled(kernel, controls, targets)?)
    }

    // =========================================================================
    // Readout
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn readout(&mut self, qubit: QubitId, bit: BitId) -> IrResult<&mut Self> {
        self.push(Instruction::readout(qubit, bit))
    }

    /// Measure every qubit into the bit with the same index.
    ///
    /// Requires `bit_count >= qubit_count`.
    pub fn readout_all(&mut self) -> IrResult<&mut Self> {
        for q in 1..=self.qubit_count {
            self.readout(QubitId(q), BitId(q))?;
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of qubits.
    #[inline]
    pub fn qubit_count(&self) -> u32 {
        self.qubit_count
    }

    /// Number of classical bits.
    #[inline]
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Instructions in program order.
    #[inline]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consume the circuit, returning its instruction list.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Number of instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the circuit has no instructions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of gate instructions (readouts excluded).
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Circuit depth: the longest per-qubit chain of instructions.
    pub fn depth(&self) -> usize {
        let mut frontier = vec![0usize; self.qubit_count as usize];
        for instruction in &self.instructions {
            let level = instruction
                .qubits()
                .iter()
                .map(|q| frontier[q.offset()])
                .max()
                .unwrap_or(0)
                + 1;
            for qubit in instruction.qubits() {
                frontier[qubit.offset()] = level;
            }
        }
        frontier.into_iter().max().unwrap_or(0)
    }

    // =========================================================================
    // Prebuilt circuits
    // =========================================================================

    /// Two-qubit Bell state preparation with readout.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size(2, 2);
        circuit
            .h(QubitId(1))?
            .cx(QubitId(1), QubitId(2))?
            .readout_all()?;
        Ok(circuit)
    }

    /// N-qubit GHZ state preparation with readout.
    pub fn ghz(qubit_count: u32) -> IrResult<Self> {
        if qubit_count == 0 {
            return Ok(Self::with_size(0, 0));
        }
        let mut circuit = Self::with_size(qubit_count, qubit_count);
        circuit.h(QubitId(1))?;
        for q in 1..qubit_count {
            circuit.cx(QubitId(q), QubitId(q + 1))?;
        }
        circuit.readout_all()?;
        Ok(circuit)
    }
}

impl fmt::Display for QuantumCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "QuantumCircuit({} qubits, {} bits):",
            self.qubit_count, self.bit_count
        )?;
        for instruction in &self.instructions {
            writeln!(f, "  {instruction}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fluent_api() {
        let mut circuit = QuantumCircuit::with_size(2, 2);
        circuit
            .h(QubitId(1))
            .unwrap()
            .cx(QubitId(1), QubitId(2))
            .unwrap()
            .readout(QubitId(1), BitId(1))
            .unwrap()
            .readout(QubitId(2), BitId(2))
            .unwrap();

        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.gate_count(), 2);
        // H and CX stack on q1; the two readouts land in one layer
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_qubit_range_checked() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        assert!(matches!(
            circuit.h(QubitId(0)),
            Err(IrError::QubitOutOfRange { .. })
        ));
        assert!(matches!(
            circuit.h(QubitId(3)),
            Err(IrError::QubitOutOfRange { .. })
        ));
        assert!(circuit.h(QubitId(2)).is_ok());
    }

    #[test]
    fn test_bit_range_checked() {
        let mut circuit = QuantumCircuit::with_size(1, 1);
        assert!(matches!(
            circuit.readout(QubitId(1), BitId(2)),
            Err(IrError::BitOutOfRange { .. })
        ));
        assert!(circuit.readout(QubitId(1), BitId(1)).is_ok());
    }

    #[test]
    fn test_new_validates_instructions() {
        let bad = QuantumCircuit::new(
            1,
            0,
            vec![Instruction::gate(GateSymbol::SigmaX, vec![QubitId(2)]).unwrap()],
        );
        assert!(bad.is_err());

        let ok = QuantumCircuit::new(
            1,
            0,
            vec![Instruction::gate(GateSymbol::RotationZ(PI), vec![QubitId(1)]).unwrap()],
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_bell_circuit() {
        let bell = QuantumCircuit::bell().unwrap();
        assert_eq!(bell.qubit_count(), 2);
        assert_eq!(bell.len(), 4);
        assert_eq!(bell.instructions()[0].name(), "hadamard");
        assert_eq!(bell.instructions()[1].name(), "control_x");
    }

    #[test]
    fn test_ghz_circuit() {
        let ghz = QuantumCircuit::ghz(4).unwrap();
        assert_eq!(ghz.gate_count(), 4);
        assert_eq!(ghz.len(), 8);
    }

    #[test]
    fn test_display() {
        let mut circuit = QuantumCircuit::with_size(2, 1);
        circuit
            .h(QubitId(1))
            .unwrap()
            .readout(QubitId(1), BitId(1))
            .unwrap();
        let text = format!("{circuit}");
        assert!(text.contains("hadamard q1"));
        assert!(text.contains("readout q1 -> b1"));
    }
}
