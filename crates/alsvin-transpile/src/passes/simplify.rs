//! Simplification passes.
//!
//! Unlike the decomposition passes these rewrites are equivalences up to
//! global phase. That is fine for a circuit that will be sampled, but it
//! breaks conditioning: run them only once no `controlled` structure is
//! left to re-wrap their output.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use alsvin_ir::{GateSymbol, Instruction, QuantumCircuit, QubitId, operator};

use crate::error::TranspileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::{one_qubit, rewrite_instructions};
use crate::unitary::Unitary2x2;

/// Default absolute tolerance for the angle and matrix comparisons of the
/// simplification passes.
pub const DEFAULT_ATOL: f64 = 1e-6;

/// Remove adjacent gate pairs that multiply to the identity.
///
/// Two gates pair up when the second is the first instruction touching
/// any of the first's qubits, acts on exactly the same qubits, and its
/// symbol is the first's inverse within `atol`. Operand order is ignored
/// for the permutation-symmetric pair gates (`swap`, `iswap`,
/// `iswap_dagger`, `control_z`). Sweeps repeat until a sweep removes
/// nothing, so pairs exposed by earlier removals cancel too.
pub struct CancelInversePairs {
    atol: f64,
}

impl CancelInversePairs {
    pub fn new(atol: f64) -> Self {
        CancelInversePairs { atol }
    }

    fn find_cancellations(&self, instructions: &[Instruction]) -> Vec<usize> {
        let mut claimed = vec![false; instructions.len()];
        let mut cancelled = vec![];
        for i in 0..instructions.len() {
            if claimed[i] {
                continue;
            }
            let qubits = instructions[i].qubits();
            let Some(k) = next_touching(instructions, i, &qubits) else {
                continue;
            };
            if !claimed[k] && cancels(&instructions[i], &instructions[k], self.atol) {
                claimed[i] = true;
                claimed[k] = true;
                cancelled.push(i);
                cancelled.push(k);
            }
        }
        cancelled.sort_unstable();
        cancelled
    }
}

impl Pass for CancelInversePairs {
    fn name(&self) -> &'static str {
        "CancelInversePairs"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        let qubit_count = circuit.qubit_count();
        let bit_count = circuit.bit_count();
        let mut instructions = circuit.into_instructions();
        loop {
            let cancelled = self.find_cancellations(&instructions);
            if cancelled.is_empty() {
                break;
            }
            for index in cancelled.into_iter().rev() {
                instructions.remove(index);
            }
        }
        Ok(QuantumCircuit::new(qubit_count, bit_count, instructions)?)
    }
}

/// Index of the first instruction after `start` sharing a qubit with
/// `qubits`.
fn next_touching(instructions: &[Instruction], start: usize, qubits: &[QubitId]) -> Option<usize> {
    instructions
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, candidate)| candidate.qubits().iter().any(|q| qubits.contains(q)))
        .map(|(index, _)| index)
}

fn cancels(first: &Instruction, second: &Instruction, atol: f64) -> bool {
    let (
        Instruction::Gate {
            symbol: a,
            targets: at,
            controls: ac,
        },
        Instruction::Gate {
            symbol: b,
            targets: bt,
            controls: bc,
        },
    ) = (first, second)
    else {
        return false;
    };
    if !b.approx_eq(&a.inverse(), atol) {
        return false;
    }
    if ac == bc && at == bt {
        return true;
    }
    symmetric(a)
        && ac.is_empty()
        && bc.is_empty()
        && at.len() == 2
        && bt.len() == 2
        && at[0] == bt[1]
        && at[1] == bt[0]
}

/// Gates whose matrix is invariant under swapping the two operands.
fn symmetric(symbol: &GateSymbol) -> bool {
    matches!(
        symbol,
        GateSymbol::Swap | GateSymbol::ISwap | GateSymbol::ISwapDagger | GateSymbol::ControlZ
    )
}

/// Rewrite `universal(theta, phi, lambda)` into at most three axial
/// rotations, `Rz(phi + pi/2) Rx(theta) Rz(lambda - pi/2)` up to phase.
///
/// A theta that is a full turn leaves a diagonal gate, which collapses to
/// a single `rotation_z(phi + lambda)` or to nothing.
pub struct CastUniversalToRzRxRz {
    atol: f64,
}

impl CastUniversalToRzRxRz {
    pub fn new(atol: f64) -> Self {
        CastUniversalToRzRxRz { atol }
    }

    fn lower(&self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> Vec<Instruction> {
        if Unitary2x2::normalize_angle(theta).abs() <= self.atol {
            let merged = Unitary2x2::normalize_angle(phi + lambda);
            if merged.abs() <= self.atol {
                return vec![];
            }
            return vec![one_qubit(GateSymbol::RotationZ(merged), qubit)];
        }
        let mut out = vec![];
        self.push_rotation_z(lambda - FRAC_PI_2, qubit, &mut out);
        out.push(one_qubit(GateSymbol::RotationX(theta), qubit));
        self.push_rotation_z(phi + FRAC_PI_2, qubit, &mut out);
        out
    }

    fn push_rotation_z(&self, theta: f64, qubit: QubitId, out: &mut Vec<Instruction>) {
        if Unitary2x2::normalize_angle(theta).abs() > self.atol {
            out.push(one_qubit(GateSymbol::RotationZ(theta), qubit));
        }
    }
}

impl Pass for CastUniversalToRzRxRz {
    fn name(&self) -> &'static str {
        "CastUniversalToRzRxRz"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        rewrite_instructions(circuit, |_, instruction| match instruction {
            Instruction::Gate {
                symbol: GateSymbol::Universal(theta, phi, lambda),
                targets,
                controls,
            } if controls.is_empty() && targets.len() == 1 => {
                Ok(self.lower(theta, phi, lambda, targets[0]))
            }
            other => Ok(vec![other]),
        })
    }
}

/// Replace z-axis rotations by the named gate for the special angles.
///
/// `rotation_z` and `phase_shift` agree up to global phase, so both are
/// folded onto the same normalized angle: zero drops the gate, the
/// quarter, half and eighth turns become `z_90`, `z_minus_90`, `sigma_z`,
/// `pi_8` and `pi_8_dagger`, anything else stays a `phase_shift`.
pub struct SimplifyRzGates {
    atol: f64,
}

impl SimplifyRzGates {
    pub fn new(atol: f64) -> Self {
        SimplifyRzGates { atol }
    }

    fn simplify(&self, theta: f64, qubit: QubitId) -> Vec<Instruction> {
        let t = Unitary2x2::normalize_angle(theta);
        if t.abs() <= self.atol {
            return vec![];
        }
        let symbol = if (t - FRAC_PI_2).abs() <= self.atol {
            GateSymbol::Z90
        } else if (t + FRAC_PI_2).abs() <= self.atol {
            GateSymbol::ZMinus90
        } else if (t.abs() - PI).abs() <= self.atol {
            GateSymbol::SigmaZ
        } else if (t - FRAC_PI_4).abs() <= self.atol {
            GateSymbol::Pi8
        } else if (t + FRAC_PI_4).abs() <= self.atol {
            GateSymbol::Pi8Dagger
        } else {
            GateSymbol::PhaseShift(t)
        };
        vec![one_qubit(symbol, qubit)]
    }
}

impl Pass for SimplifyRzGates {
    fn name(&self) -> &'static str {
        "SimplifyRzGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        rewrite_instructions(circuit, |_, instruction| match instruction {
            Instruction::Gate {
                symbol: GateSymbol::RotationZ(theta) | GateSymbol::PhaseShift(theta),
                targets,
                controls,
            } if controls.is_empty() && targets.len() == 1 => {
                Ok(self.simplify(theta, targets[0]))
            }
            other => Ok(vec![other]),
        })
    }
}

/// Replace x-axis rotations by the named gate for the special angles.
///
/// Zero drops the gate and the quarter and half turns become `x_90`,
/// `x_minus_90` and `sigma_x`. A leftover angle is rebuilt from the
/// native diagonal family as `Z90 X90 P(theta + pi) X90 Z90`, which
/// equals `Rx(theta)` up to phase.
pub struct SimplifyRxGates {
    atol: f64,
}

impl SimplifyRxGates {
    pub fn new(atol: f64) -> Self {
        SimplifyRxGates { atol }
    }

    fn simplify(&self, theta: f64, qubit: QubitId) -> Vec<Instruction> {
        let t = Unitary2x2::normalize_angle(theta);
        if t.abs() <= self.atol {
            return vec![];
        }
        if (t - FRAC_PI_2).abs() <= self.atol {
            return vec![one_qubit(GateSymbol::X90, qubit)];
        }
        if (t + FRAC_PI_2).abs() <= self.atol {
            return vec![one_qubit(GateSymbol::XMinus90, qubit)];
        }
        if (t.abs() - PI).abs() <= self.atol {
            return vec![one_qubit(GateSymbol::SigmaX, qubit)];
        }
        let phi = Unitary2x2::normalize_angle(t + PI);
        vec![
            one_qubit(GateSymbol::Z90, qubit),
            one_qubit(GateSymbol::X90, qubit),
            one_qubit(GateSymbol::PhaseShift(phi), qubit),
            one_qubit(GateSymbol::X90, qubit),
            one_qubit(GateSymbol::Z90, qubit),
        ]
    }
}

impl Pass for SimplifyRxGates {
    fn name(&self) -> &'static str {
        "SimplifyRxGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        rewrite_instructions(circuit, |_, instruction| match instruction {
            Instruction::Gate {
                symbol: GateSymbol::RotationX(theta),
                targets,
                controls,
            } if controls.is_empty() && targets.len() == 1 => {
                Ok(self.simplify(theta, targets[0]))
            }
            other => Ok(vec![other]),
        })
    }
}

/// Drop single-qubit gates whose matrix is the identity up to global
/// phase within `atol`.
pub struct SimplifyTrivialGates {
    atol: f64,
}

impl SimplifyTrivialGates {
    pub fn new(atol: f64) -> Self {
        SimplifyTrivialGates { atol }
    }
}

impl Pass for SimplifyTrivialGates {
    fn name(&self) -> &'static str {
        "SimplifyTrivialGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        let identity = operator::identity(2);
        rewrite_instructions(circuit, |_, instruction| {
            if let Some(symbol) = instruction.symbol() {
                if symbol.num_qubits() == 1
                    && operator::approx_eq_up_to_phase(&symbol.matrix(), &identity, self.atol)
                {
                    return Ok(vec![]);
                }
            }
            Ok(vec![instruction])
        })
    }
}
