//! Circuit instructions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::GateSymbol;
use crate::qubit::{BitId, QubitId};

/// One step of a circuit: a gate application or a readout.
///
/// `controls` is populated only for the `Controlled` wrap symbol; the
/// named controlled gates (`control_x`, `control_z`, `toffoli`) keep all
/// operands in `targets`, control first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Apply a gate.
    Gate {
        /// The gate symbol with its parameters.
        symbol: GateSymbol,
        /// Target qubits in the symbol's operand order.
        targets: Vec<QubitId>,
        /// Control qubits of a `Controlled` wrap.
        controls: Vec<QubitId>,
    },
    /// Measure a qubit into a classical bit.
    Readout {
        /// The measured qubit.
        qubit: QubitId,
        /// The destination bit.
        bit: BitId,
    },
}

impl Instruction {
    /// Create a gate instruction, checking arity and operand uniqueness.
    pub fn gate(symbol: GateSymbol, targets: Vec<QubitId>) -> IrResult<Self> {
        if let GateSymbol::Controlled {
            kernel,
            control_count,
        } = &symbol
        {
            // Split a flat operand list: controls first, kernel targets after.
            let split = *control_count as usize;
            if targets.len() < split {
                return Err(IrError::ControlCountMismatch {
                    gate_name: kernel.name().to_string(),
                    expected: *control_count,
                    got: targets.len() as u32,
                });
            }
            let controls = targets[..split].to_vec();
            let rest = targets[split..].to_vec();
            return Self::controlled((**kernel).clone(), controls, rest);
        }
        let expected = symbol.num_qubits();
        if targets.len() as u32 != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: symbol.name().to_string(),
                expected,
                got: targets.len() as u32,
            });
        }
        check_distinct(&targets, symbol.name())?;
        Ok(Instruction::Gate {
            symbol,
            targets,
            controls: vec![],
        })
    }

    /// Create a controlled-wrap instruction from explicit control and
    /// target lists.
    ///
    /// Normalizes through [`GateSymbol::controlled`], so a single control
    /// around `sigma_x` comes back as a plain `control_x` gate.
    pub fn controlled(
        kernel: GateSymbol,
        controls: Vec<QubitId>,
        targets: Vec<QubitId>,
    ) -> IrResult<Self> {
        let expected = kernel.num_qubits();
        if targets.len() as u32 != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: kernel.name().to_string(),
                expected,
                got: targets.len() as u32,
            });
        }
        let symbol = GateSymbol::controlled(kernel, controls.len() as u32);
        let flat: Vec<QubitId> = controls.into_iter().chain(targets).collect();
        check_distinct(&flat, symbol.name())?;
        match symbol {
            // Normalization may fold a named controlled kernel into the
            // wrap (e.g. controlled control_z becomes a two-control
            // sigma_z), so re-split the operand list at the final count.
            GateSymbol::Controlled { control_count, .. } => {
                let split = control_count as usize;
                Ok(Instruction::Gate {
                    targets: flat[split..].to_vec(),
                    controls: flat[..split].to_vec(),
                    symbol,
                })
            }
            // Normalized to a named gate: operands fold into targets.
            named => Self::gate(named, flat),
        }
    }

    /// Create a readout instruction.
    pub fn readout(qubit: QubitId, bit: BitId) -> Self {
        Instruction::Readout { qubit, bit }
    }

    /// Check if this is a gate instruction.
    #[inline]
    pub fn is_gate(&self) -> bool {
        matches!(self, Instruction::Gate { .. })
    }

    /// Check if this is a readout instruction.
    #[inline]
    pub fn is_readout(&self) -> bool {
        matches!(self, Instruction::Readout { .. })
    }

    /// The gate symbol, if this is a gate.
    pub fn symbol(&self) -> Option<&GateSymbol> {
        match self {
            Instruction::Gate { symbol, .. } => Some(symbol),
            Instruction::Readout { .. } => None,
        }
    }

    /// All qubits this instruction touches, controls first.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Instruction::Gate {
                targets, controls, ..
            } => controls.iter().chain(targets.iter()).copied().collect(),
            Instruction::Readout { qubit, .. } => vec![*qubit],
        }
    }

    /// Name of the instruction for diagnostics and export.
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Gate { symbol, .. } => symbol.name(),
            Instruction::Readout { .. } => "readout",
        }
    }
}

fn check_distinct(qubits: &[QubitId], gate_name: &str) -> IrResult<()> {
    for (i, qubit) in qubits.iter().enumerate() {
        if qubits[..i].contains(qubit) {
            return Err(IrError::DuplicateQubit {
                qubit: *qubit,
                gate_name: gate_name.to_string(),
            });
        }
    }
    Ok(())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Gate {
                symbol,
                targets,
                controls,
            } => {
                write!(f, "{symbol}")?;
                if !controls.is_empty() {
                    let c = controls
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, " [{c}]")?;
                }
                let t = targets
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, " {t}")
            }
            Instruction::Readout { qubit, bit } => write!(f, "readout {qubit} -> {bit}"),
        }
    }
}
