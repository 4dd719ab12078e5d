//! Decomposition passes.
//!
//! Table-driven lowering keyed on the gate symbol. Every rewrite here is
//! phase-exact: a decomposed gate equals its source matrix including the
//! global phase, so the results stay correct under later control wraps
//! and under readout. Phase-dropping rewrites belong to the simplify
//! passes, which run only once no controlled structure is left.

use std::f64::consts::FRAC_PI_2;

use alsvin_ir::{GateSymbol, Instruction, QuantumCircuit, QubitId};

use crate::error::{TranspileError, TranspileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::{one_qubit, rewrite_instructions, three_qubit, two_qubit};
use crate::unitary::{EPSILON, Unitary2x2};

/// Lower `controlled` wrap instructions to named gates.
///
/// Single-qubit kernels with one control go through the ABC conjugation
/// (two CX around rotations, plus a phase on the control); additional
/// controls recurse through the square-root construction. Two-qubit
/// kernels are factored exactly and each factor is wrapped. The named
/// `control_x`, `control_z`, `toffoli` symbols are left for the cast
/// passes.
pub struct DecomposeControlled;

impl Pass for DecomposeControlled {
    fn name(&self) -> &'static str {
        "DecomposeControlled"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        rewrite_instructions(circuit, |index, instruction| match instruction {
            Instruction::Gate {
                symbol: GateSymbol::Controlled { kernel, .. },
                targets,
                controls,
            } => lower_controlled(index, &kernel, &controls, &targets),
            other => Ok(vec![other]),
        })
    }
}

fn unsupported(index: usize, symbol: &GateSymbol) -> TranspileError {
    TranspileError::UnsupportedInstruction {
        index,
        name: symbol.name().to_string(),
    }
}

fn lower_controlled(
    index: usize,
    kernel: &GateSymbol,
    controls: &[QubitId],
    targets: &[QubitId],
) -> TranspileResult<Vec<Instruction>> {
    match kernel {
        GateSymbol::SigmaX => {
            let &[t] = targets else {
                return Err(unsupported(index, kernel));
            };
            Ok(emit_controlled_x(controls, t))
        }
        GateSymbol::SigmaZ => {
            let &[t] = targets else {
                return Err(unsupported(index, kernel));
            };
            Ok(lower_controlled_z(controls, t))
        }
        GateSymbol::Swap => {
            let &[a, b] = targets else {
                return Err(unsupported(index, kernel));
            };
            Ok(lower_controlled_swap(controls, a, b))
        }
        GateSymbol::ISwap | GateSymbol::ISwapDagger => {
            let &[a, b] = targets else {
                return Err(unsupported(index, kernel));
            };
            let dagger = matches!(kernel, GateSymbol::ISwapDagger);
            Ok(lower_controlled_iswap(controls, a, b, dagger))
        }
        other => {
            let (Some(v), &[t]) = (Unitary2x2::from_symbol(other), targets) else {
                return Err(unsupported(index, other));
            };
            Ok(lower_controlled_unitary(&v, controls, t))
        }
    }
}

/// Multi-control unitary via the square-root recursion.
///
/// `C^n(V) = C(W on last) . C^{n-1}(X into last) . C(W+ on last)
///         . C^{n-1}(X into last) . C^{n-1}(W)` with `W = sqrt(V)`.
fn lower_controlled_unitary(
    v: &Unitary2x2,
    controls: &[QubitId],
    target: QubitId,
) -> Vec<Instruction> {
    if v.is_identity() {
        // A controlled phase never touches the target: it is a phase
        // gate on one control wrapped in the remaining controls.
        let delta = v.data[0].arg();
        return lower_controlled_phase(delta, controls);
    }
    match controls {
        [] => vec![],
        &[control] => lower_single_controlled(v, control, target),
        [rest @ .., last] => {
            let w = v.sqrt();
            let mut out = lower_single_controlled(&w, *last, target);
            out.extend(emit_controlled_x(rest, *last));
            out.extend(lower_single_controlled(&w.dagger(), *last, target));
            out.extend(emit_controlled_x(rest, *last));
            out.extend(lower_controlled_unitary(&w, rest, target));
            out
        }
    }
}

/// ABC conjugation for one control.
///
/// With `V = e^{id} Rz(a) Ry(b) Rz(g)`, the gates `C = Rz((g-a)/2)`,
/// `B = Ry(-b/2) Rz(-(g+a)/2)` and `A = Rz(a) Ry(b/2)` satisfy
/// `A B C = I` and `A X B X C = e^{-id} V`, so conjugating the two CX
/// reproduces V on the target exactly when the control is set. Angles
/// are elided only when the raw value is zero: Rz is 4pi-periodic, so
/// normalizing here would leak a conditional sign.
fn lower_single_controlled(v: &Unitary2x2, control: QubitId, target: QubitId) -> Vec<Instruction> {
    let (alpha, beta, gamma, phase) = v.zyz_decomposition();
    let mut out = vec![];
    push_rotation_z((gamma - alpha) / 2.0, target, &mut out);
    out.push(two_qubit(GateSymbol::ControlX, control, target));
    push_rotation_z(-(gamma + alpha) / 2.0, target, &mut out);
    push_rotation_y(-beta / 2.0, target, &mut out);
    out.push(two_qubit(GateSymbol::ControlX, control, target));
    push_rotation_y(beta / 2.0, target, &mut out);
    push_rotation_z(alpha, target, &mut out);
    push_phase_shift(phase, control, &mut out);
    out
}

/// Multi-control phase: recurse with the last control as the new target.
fn lower_controlled_phase(delta: f64, controls: &[QubitId]) -> Vec<Instruction> {
    match controls {
        [] => vec![],
        &[only] => {
            let mut out = vec![];
            push_phase_shift(delta, only, &mut out);
            out
        }
        [rest @ .., last] => lower_controlled_unitary(&Unitary2x2::p(delta), rest, *last),
    }
}

/// Multi-control X: named gates up to two controls, recursion beyond.
fn emit_controlled_x(controls: &[QubitId], target: QubitId) -> Vec<Instruction> {
    match controls {
        [] => vec![one_qubit(GateSymbol::SigmaX, target)],
        &[c] => vec![two_qubit(GateSymbol::ControlX, c, target)],
        &[c1, c2] => vec![three_qubit(GateSymbol::Toffoli, c1, c2, target)],
        many => lower_controlled_unitary(&Unitary2x2::x(), many, target),
    }
}

/// Multi-control Z through Hadamard conjugation: `H X H = Z` exactly.
fn lower_controlled_z(controls: &[QubitId], target: QubitId) -> Vec<Instruction> {
    let mut out = vec![one_qubit(GateSymbol::Hadamard, target)];
    out.extend(emit_controlled_x(controls, target));
    out.push(one_qubit(GateSymbol::Hadamard, target));
    out
}

/// Multi-control SWAP through the Fredkin construction:
/// `SWAP(a,b) = CX(b,a) . CX(a,b) . CX(b,a)`, and only the middle
/// factor needs the controls.
fn lower_controlled_swap(controls: &[QubitId], a: QubitId, b: QubitId) -> Vec<Instruction> {
    let mut inner: Vec<QubitId> = controls.to_vec();
    inner.push(a);
    let mut out = vec![two_qubit(GateSymbol::ControlX, b, a)];
    out.extend(emit_controlled_x(&inner, b));
    out.push(two_qubit(GateSymbol::ControlX, b, a));
    out
}

/// Multi-control iSWAP via the exact factorization
/// `iSWAP(a,b) = P(pi/2 on a) . P(pi/2 on b) . CZ(a,b) . SWAP(a,b)`
/// (program order), wrapping each factor separately.
fn lower_controlled_iswap(
    controls: &[QubitId],
    a: QubitId,
    b: QubitId,
    dagger: bool,
) -> Vec<Instruction> {
    let mut cz_controls: Vec<QubitId> = controls.to_vec();
    cz_controls.push(a);
    let phases = |out: &mut Vec<Instruction>, sign: f64| {
        out.extend(lower_controlled_unitary(
            &Unitary2x2::p(sign * FRAC_PI_2),
            controls,
            a,
        ));
        out.extend(lower_controlled_unitary(
            &Unitary2x2::p(sign * FRAC_PI_2),
            controls,
            b,
        ));
    };
    let mut out = vec![];
    if dagger {
        out.extend(lower_controlled_swap(controls, a, b));
        out.extend(lower_controlled_z(&cz_controls, b));
        phases(&mut out, -1.0);
    } else {
        phases(&mut out, 1.0);
        out.extend(lower_controlled_z(&cz_controls, b));
        out.extend(lower_controlled_swap(controls, a, b));
    }
    out
}

fn push_rotation_z(theta: f64, qubit: QubitId, out: &mut Vec<Instruction>) {
    if theta.abs() > EPSILON {
        out.push(one_qubit(GateSymbol::RotationZ(theta), qubit));
    }
}

fn push_rotation_y(theta: f64, qubit: QubitId, out: &mut Vec<Instruction>) {
    if theta.abs() > EPSILON {
        out.push(one_qubit(GateSymbol::RotationY(theta), qubit));
    }
}

fn push_phase_shift(phi: f64, qubit: QubitId, out: &mut Vec<Instruction>) {
    // PhaseShift is 2pi-periodic, so normalized elision is safe here
    if Unitary2x2::normalize_angle(phi).abs() > EPSILON {
        out.push(one_qubit(GateSymbol::PhaseShift(phi), qubit));
    }
}

/// Rewrite Toffoli gates into the standard six-CX network.
pub struct CastToffoliToCX;

impl Pass for CastToffoliToCX {
    fn name(&self) -> &'static str {
        "CastToffoliToCX"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        rewrite_instructions(circuit, |index, instruction| match instruction {
            Instruction::Gate {
                symbol: GateSymbol::Toffoli,
                targets,
                ..
            } => {
                let &[a, b, c] = targets.as_slice() else {
                    return Err(unsupported(index, &GateSymbol::Toffoli));
                };
                Ok(toffoli_network(a, b, c))
            }
            other => Ok(vec![other]),
        })
    }
}

/// The textbook Toffoli network: six CX, seven pi/8-family gates, two
/// Hadamard. Phase-exact.
fn toffoli_network(a: QubitId, b: QubitId, c: QubitId) -> Vec<Instruction> {
    vec![
        one_qubit(GateSymbol::Hadamard, c),
        two_qubit(GateSymbol::ControlX, b, c),
        one_qubit(GateSymbol::Pi8Dagger, c),
        two_qubit(GateSymbol::ControlX, a, c),
        one_qubit(GateSymbol::Pi8, c),
        two_qubit(GateSymbol::ControlX, b, c),
        one_qubit(GateSymbol::Pi8Dagger, c),
        two_qubit(GateSymbol::ControlX, a, c),
        one_qubit(GateSymbol::Pi8, b),
        one_qubit(GateSymbol::Pi8, c),
        one_qubit(GateSymbol::Hadamard, c),
        two_qubit(GateSymbol::ControlX, a, b),
        one_qubit(GateSymbol::Pi8, a),
        one_qubit(GateSymbol::Pi8Dagger, b),
        two_qubit(GateSymbol::ControlX, a, b),
    ]
}

/// Rewrite CX as a CZ conjugated by Hadamard on the target.
pub struct CastCXToCZ;

impl Pass for CastCXToCZ {
    fn name(&self) -> &'static str {
        "CastCXToCZ"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        rewrite_instructions(circuit, |index, instruction| match instruction {
            Instruction::Gate {
                symbol: GateSymbol::ControlX,
                targets,
                ..
            } => {
                let &[control, target] = targets.as_slice() else {
                    return Err(unsupported(index, &GateSymbol::ControlX));
                };
                Ok(vec![
                    one_qubit(GateSymbol::Hadamard, target),
                    two_qubit(GateSymbol::ControlZ, control, target),
                    one_qubit(GateSymbol::Hadamard, target),
                ])
            }
            other => Ok(vec![other]),
        })
    }
}

/// Rewrite iSWAP and its adjoint into phase shifts, one CZ and a SWAP.
///
/// The SWAP is deliberately left as a symbol: routing treats it like any
/// other two-qubit gate, and `CastSwapToCZ` lowers whatever survives.
pub struct CastISwapToCZ;

impl Pass for CastISwapToCZ {
    fn name(&self) -> &'static str {
        "CastISwapToCZ"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        rewrite_instructions(circuit, |index, instruction| match instruction {
            Instruction::Gate {
                symbol: symbol @ (GateSymbol::ISwap | GateSymbol::ISwapDagger),
                targets,
                ..
            } => {
                let &[a, b] = targets.as_slice() else {
                    return Err(unsupported(index, &symbol));
                };
                Ok(if matches!(symbol, GateSymbol::ISwap) {
                    vec![
                        one_qubit(GateSymbol::PhaseShift(FRAC_PI_2), a),
                        one_qubit(GateSymbol::PhaseShift(FRAC_PI_2), b),
                        two_qubit(GateSymbol::ControlZ, a, b),
                        two_qubit(GateSymbol::Swap, a, b),
                    ]
                } else {
                    vec![
                        two_qubit(GateSymbol::Swap, a, b),
                        two_qubit(GateSymbol::ControlZ, a, b),
                        one_qubit(GateSymbol::PhaseShift(-FRAC_PI_2), a),
                        one_qubit(GateSymbol::PhaseShift(-FRAC_PI_2), b),
                    ]
                })
            }
            other => Ok(vec![other]),
        })
    }
}

/// Rewrite SWAP into three Hadamard-conjugated CZ.
pub struct CastSwapToCZ;

impl Pass for CastSwapToCZ {
    fn name(&self) -> &'static str {
        "CastSwapToCZ"
    }

    fn kind(&self) -> PassKind {
        PassKind::Rewrite
    }

    fn apply(&self, circuit: QuantumCircuit) -> TranspileResult<QuantumCircuit> {
        rewrite_instructions(circuit, |index, instruction| match instruction {
            Instruction::Gate {
                symbol: GateSymbol::Swap,
                targets,
                ..
            } => {
                let &[a, b] = targets.as_slice() else {
                    return Err(unsupported(index, &GateSymbol::Swap));
                };
                // SWAP = CX(a,b) . CX(b,a) . CX(a,b), each CX lowered
                Ok(vec![
                    one_qubit(GateSymbol::Hadamard, b),
                    two_qubit(GateSymbol::ControlZ, a, b),
                    one_qubit(GateSymbol::Hadamard, b),
                    one_qubit(GateSymbol::Hadamard, a),
                    two_qubit(GateSymbol::ControlZ, b, a),
                    one_qubit(GateSymbol::Hadamard, a),
                    one_qubit(GateSymbol::Hadamard, b),
                    two_qubit(GateSymbol::ControlZ, a, b),
                    one_qubit(GateSymbol::Hadamard, b),
                ])
            }
            other => Ok(vec![other]),
        })
    }
}
