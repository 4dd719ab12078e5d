//! The gate symbol catalog.
//!
//! [`GateSymbol`] is the closed set of instructions the transpiler knows
//! how to rewrite. Every variant carries its matrix generator, arity and
//! exact inverse; parameters are plain radians stored inline. The
//! `Controlled` variant wraps a one- or two-qubit kernel in an arbitrary
//! number of controls, and [`GateSymbol::controlled`] normalizes the
//! common wrappings (`C(X)`, `CC(X)`, `C(Z)`) to their named forms.

use ndarray::array;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};
use std::fmt;

use crate::operator::{self, Operator};

/// A gate symbol with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateSymbol {
    // Single-qubit discrete gates
    /// Identity gate.
    Identity,
    /// Pauli-X gate.
    SigmaX,
    /// Pauli-Y gate.
    SigmaY,
    /// Pauli-Z gate.
    SigmaZ,
    /// Hadamard gate.
    Hadamard,
    /// Phase shift `diag(1, e^{i phi})`.
    PhaseShift(f64),
    /// The pi/8 gate, `diag(1, e^{i pi/4})`.
    Pi8,
    /// Adjoint of the pi/8 gate.
    Pi8Dagger,
    /// X rotation by +90 degrees.
    X90,
    /// X rotation by -90 degrees.
    XMinus90,
    /// Y rotation by +90 degrees.
    Y90,
    /// Y rotation by -90 degrees.
    YMinus90,
    /// Z rotation by +90 degrees.
    Z90,
    /// Z rotation by -90 degrees.
    ZMinus90,

    // Single-qubit rotation gates
    /// Rotation by `theta` about the axis `cos(phi) X + sin(phi) Y`.
    Rotation(f64, f64),
    /// Rotation about the X axis.
    RotationX(f64),
    /// Rotation about the Y axis.
    RotationY(f64),
    /// Rotation about the Z axis.
    RotationZ(f64),
    /// Universal single-qubit gate `U(theta, phi, lambda)`.
    Universal(f64, f64, f64),

    // Two-qubit gates
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Adjoint of the iSWAP gate.
    ISwapDagger,
    /// Controlled-X (CNOT); the first operand is the control.
    ControlX,
    /// Controlled-Z; symmetric in its operands.
    ControlZ,

    // Three-qubit gates
    /// Toffoli gate; the first two operands are the controls.
    Toffoli,

    /// Arbitrary controlled wrap of a one- or two-qubit kernel.
    Controlled {
        /// The wrapped gate.
        kernel: Box<GateSymbol>,
        /// Number of control qubits.
        control_count: u32,
    },
}

impl GateSymbol {
    /// Get the name of this symbol.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateSymbol::Identity => "identity",
            GateSymbol::SigmaX => "sigma_x",
            GateSymbol::SigmaY => "sigma_y",
            GateSymbol::SigmaZ => "sigma_z",
            GateSymbol::Hadamard => "hadamard",
            GateSymbol::PhaseShift(_) => "phase_shift",
            GateSymbol::Pi8 => "pi_8",
            GateSymbol::Pi8Dagger => "pi_8_dagger",
            GateSymbol::X90 => "x_90",
            GateSymbol::XMinus90 => "x_minus_90",
            GateSymbol::Y90 => "y_90",
            GateSymbol::YMinus90 => "y_minus_90",
            GateSymbol::Z90 => "z_90",
            GateSymbol::ZMinus90 => "z_minus_90",
            GateSymbol::Rotation(_, _) => "rotation",
            GateSymbol::RotationX(_) => "rotation_x",
            GateSymbol::RotationY(_) => "rotation_y",
            GateSymbol::RotationZ(_) => "rotation_z",
            GateSymbol::Universal(_, _, _) => "universal",
            GateSymbol::Swap => "swap",
            GateSymbol::ISwap => "iswap",
            GateSymbol::ISwapDagger => "iswap_dagger",
            GateSymbol::ControlX => "control_x",
            GateSymbol::ControlZ => "control_z",
            GateSymbol::Toffoli => "toffoli",
            GateSymbol::Controlled { .. } => "controlled",
        }
    }

    /// Get the number of qubits this symbol acts on, controls included.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateSymbol::Identity
            | GateSymbol::SigmaX
            | GateSymbol::SigmaY
            | GateSymbol::SigmaZ
            | GateSymbol::Hadamard
            | GateSymbol::PhaseShift(_)
            | GateSymbol::Pi8
            | GateSymbol::Pi8Dagger
            | GateSymbol::X90
            | GateSymbol::XMinus90
            | GateSymbol::Y90
            | GateSymbol::YMinus90
            | GateSymbol::Z90
            | GateSymbol::ZMinus90
            | GateSymbol::Rotation(_, _)
            | GateSymbol::RotationX(_)
            | GateSymbol::RotationY(_)
            | GateSymbol::RotationZ(_)
            | GateSymbol::Universal(_, _, _) => 1,

            GateSymbol::Swap
            | GateSymbol::ISwap
            | GateSymbol::ISwapDagger
            | GateSymbol::ControlX
            | GateSymbol::ControlZ => 2,

            GateSymbol::Toffoli => 3,

            GateSymbol::Controlled {
                kernel,
                control_count,
            } => control_count + kernel.num_qubits(),
        }
    }

    /// Get the parameters of this symbol in declaration order.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            GateSymbol::PhaseShift(phi) => vec![*phi],
            GateSymbol::Rotation(theta, phi) => vec![*theta, *phi],
            GateSymbol::RotationX(theta)
            | GateSymbol::RotationY(theta)
            | GateSymbol::RotationZ(theta) => vec![*theta],
            GateSymbol::Universal(theta, phi, lambda) => vec![*theta, *phi, *lambda],
            GateSymbol::Controlled { kernel, .. } => kernel.parameters(),
            _ => vec![],
        }
    }

    /// The exact inverse symbol, `U^-1 = U^dagger` with no residual phase.
    pub fn inverse(&self) -> GateSymbol {
        match self {
            GateSymbol::Identity => GateSymbol::Identity,
            GateSymbol::SigmaX => GateSymbol::SigmaX,
            GateSymbol::SigmaY => GateSymbol::SigmaY,
            GateSymbol::SigmaZ => GateSymbol::SigmaZ,
            GateSymbol::Hadamard => GateSymbol::Hadamard,
            GateSymbol::PhaseShift(phi) => GateSymbol::PhaseShift(-phi),
            GateSymbol::Pi8 => GateSymbol::Pi8Dagger,
            GateSymbol::Pi8Dagger => GateSymbol::Pi8,
            GateSymbol::X90 => GateSymbol::XMinus90,
            GateSymbol::XMinus90 => GateSymbol::X90,
            GateSymbol::Y90 => GateSymbol::YMinus90,
            GateSymbol::YMinus90 => GateSymbol::Y90,
            GateSymbol::Z90 => GateSymbol::ZMinus90,
            GateSymbol::ZMinus90 => GateSymbol::Z90,
            GateSymbol::Rotation(theta, phi) => GateSymbol::Rotation(-theta, *phi),
            GateSymbol::RotationX(theta) => GateSymbol::RotationX(-theta),
            GateSymbol::RotationY(theta) => GateSymbol::RotationY(-theta),
            GateSymbol::RotationZ(theta) => GateSymbol::RotationZ(-theta),
            GateSymbol::Universal(theta, phi, lambda) => {
                GateSymbol::Universal(-theta, -lambda, -phi)
            }
            GateSymbol::Swap => GateSymbol::Swap,
            GateSymbol::ISwap => GateSymbol::ISwapDagger,
            GateSymbol::ISwapDagger => GateSymbol::ISwap,
            GateSymbol::ControlX => GateSymbol::ControlX,
            GateSymbol::ControlZ => GateSymbol::ControlZ,
            GateSymbol::Toffoli => GateSymbol::Toffoli,
            GateSymbol::Controlled {
                kernel,
                control_count,
            } => GateSymbol::Controlled {
                kernel: Box::new(kernel.inverse()),
                control_count: *control_count,
            },
        }
    }

    /// Wrap a kernel in `control_count` controls, normalizing the named
    /// controlled gates and flattening nested wraps.
    pub fn controlled(kernel: GateSymbol, control_count: u32) -> GateSymbol {
        if control_count == 0 {
            return kernel;
        }
        match kernel {
            GateSymbol::Controlled {
                kernel: inner,
                control_count: inner_count,
            } => GateSymbol::controlled(*inner, control_count + inner_count),
            GateSymbol::SigmaX if control_count == 1 => GateSymbol::ControlX,
            GateSymbol::SigmaX if control_count == 2 => GateSymbol::Toffoli,
            GateSymbol::SigmaZ if control_count == 1 => GateSymbol::ControlZ,
            // Named controlled gates fold their own controls into the wrap
            GateSymbol::ControlX => GateSymbol::controlled(GateSymbol::SigmaX, control_count + 1),
            GateSymbol::ControlZ => GateSymbol::controlled(GateSymbol::SigmaZ, control_count + 1),
            GateSymbol::Toffoli => GateSymbol::controlled(GateSymbol::SigmaX, control_count + 2),
            kernel => GateSymbol::Controlled {
                kernel: Box::new(kernel),
                control_count,
            },
        }
    }

    /// The unitary matrix of this symbol, `2^n x 2^n` with the first
    /// operand as the most significant basis bit.
    pub fn matrix(&self) -> Operator {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let im = Complex64::new(0.0, 1.0);
        match self {
            GateSymbol::Identity => operator::identity(2),
            GateSymbol::SigmaX => array![[zero, one], [one, zero]],
            GateSymbol::SigmaY => array![[zero, -im], [im, zero]],
            GateSymbol::SigmaZ => array![[one, zero], [zero, -one]],
            GateSymbol::Hadamard => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[h, h], [h, -h]]
            }
            GateSymbol::PhaseShift(phi) => {
                array![[one, zero], [zero, Complex64::from_polar(1.0, *phi)]]
            }
            GateSymbol::Pi8 => GateSymbol::PhaseShift(FRAC_PI_4).matrix(),
            GateSymbol::Pi8Dagger => GateSymbol::PhaseShift(-FRAC_PI_4).matrix(),
            GateSymbol::X90 => GateSymbol::RotationX(FRAC_PI_2).matrix(),
            GateSymbol::XMinus90 => GateSymbol::RotationX(-FRAC_PI_2).matrix(),
            GateSymbol::Y90 => GateSymbol::RotationY(FRAC_PI_2).matrix(),
            GateSymbol::YMinus90 => GateSymbol::RotationY(-FRAC_PI_2).matrix(),
            GateSymbol::Z90 => GateSymbol::RotationZ(FRAC_PI_2).matrix(),
            GateSymbol::ZMinus90 => GateSymbol::RotationZ(-FRAC_PI_2).matrix(),
            GateSymbol::Rotation(theta, phi) => {
                let cos = Complex64::new((theta / 2.0).cos(), 0.0);
                let sin = (theta / 2.0).sin();
                array![
                    [cos, -im * Complex64::from_polar(sin, -phi)],
                    [-im * Complex64::from_polar(sin, *phi), cos],
                ]
            }
            GateSymbol::RotationX(theta) => GateSymbol::Rotation(*theta, 0.0).matrix(),
            GateSymbol::RotationY(theta) => GateSymbol::Rotation(*theta, FRAC_PI_2).matrix(),
            GateSymbol::RotationZ(theta) => {
                array![
                    [Complex64::from_polar(1.0, -theta / 2.0), zero],
                    [zero, Complex64::from_polar(1.0, theta / 2.0)],
                ]
            }
            GateSymbol::Universal(theta, phi, lambda) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [
                        Complex64::new(cos, 0.0),
                        -Complex64::from_polar(sin, *lambda)
                    ],
                    [
                        Complex64::from_polar(sin, *phi),
                        Complex64::from_polar(cos, phi + lambda)
                    ],
                ]
            }
            GateSymbol::Swap => array![
                [one, zero, zero, zero],
                [zero, zero, one, zero],
                [zero, one, zero, zero],
                [zero, zero, zero, one],
            ],
            GateSymbol::ISwap => array![
                [one, zero, zero, zero],
                [zero, zero, im, zero],
                [zero, im, zero, zero],
                [zero, zero, zero, one],
            ],
            GateSymbol::ISwapDagger => array![
                [one, zero, zero, zero],
                [zero, zero, -im, zero],
                [zero, -im, zero, zero],
                [zero, zero, zero, one],
            ],
            GateSymbol::ControlX => embed_controlled(&GateSymbol::SigmaX.matrix(), 1),
            GateSymbol::ControlZ => embed_controlled(&GateSymbol::SigmaZ.matrix(), 1),
            GateSymbol::Toffoli => embed_controlled(&GateSymbol::SigmaX.matrix(), 2),
            GateSymbol::Controlled {
                kernel,
                control_count,
            } => embed_controlled(&kernel.matrix(), *control_count),
        }
    }

    /// Structural comparison with parameters compared within `atol`.
    ///
    /// `phase_shift(x)` and `rotation_z(x)` are never approx-equal even
    /// though they agree up to global phase; this compares symbols, not
    /// matrices.
    pub fn approx_eq(&self, other: &GateSymbol, atol: f64) -> bool {
        match (self, other) {
            (
                GateSymbol::Controlled {
                    kernel: a,
                    control_count: n,
                },
                GateSymbol::Controlled {
                    kernel: b,
                    control_count: m,
                },
            ) => n == m && a.approx_eq(b, atol),
            (a, b) => {
                std::mem::discriminant(a) == std::mem::discriminant(b)
                    && a.parameters()
                        .iter()
                        .zip(b.parameters().iter())
                        .all(|(x, y)| (x - y).abs() <= atol)
            }
        }
    }
}

/// Embed a kernel matrix in the all-ones control block of an otherwise
/// identity operator.
fn embed_controlled(kernel: &Operator, control_count: u32) -> Operator {
    let kdim = kernel.nrows();
    let dim = kdim << control_count;
    let mut out = operator::identity(dim);
    let base = dim - kdim;
    for row in 0..kdim {
        for col in 0..kdim {
            out[[base + row, base + col]] = kernel[[row, col]];
        }
    }
    out
}

impl fmt::Display for GateSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let GateSymbol::Controlled {
            kernel,
            control_count,
        } = self
        {
            return write!(f, "controlled({kernel}, {control_count})");
        }
        let params = self.parameters();
        if params.is_empty() {
            write!(f, "{}", self.name())
        } else {
            let joined = params
                .iter()
                .map(|p| format!("{p:.4}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "{}({joined})", self.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{approx_eq, dagger};
    use std::f64::consts::PI;

    fn assert_unitary(symbol: &GateSymbol) {
        let m = symbol.matrix();
        let product = m.dot(&dagger(&m));
        assert!(
            approx_eq(&product, &operator::identity(m.nrows()), 1e-10),
            "{symbol} is not unitary"
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(GateSymbol::Hadamard.num_qubits(), 1);
        assert_eq!(GateSymbol::ControlZ.num_qubits(), 2);
        assert_eq!(GateSymbol::Toffoli.num_qubits(), 3);
        assert_eq!(
            GateSymbol::controlled(GateSymbol::Swap, 2).num_qubits(),
            4
        );
    }

    #[test]
    fn test_all_matrices_unitary() {
        let symbols = [
            GateSymbol::Identity,
            GateSymbol::SigmaX,
            GateSymbol::SigmaY,
            GateSymbol::SigmaZ,
            GateSymbol::Hadamard,
            GateSymbol::PhaseShift(0.3),
            GateSymbol::Pi8,
            GateSymbol::Pi8Dagger,
            GateSymbol::X90,
            GateSymbol::XMinus90,
            GateSymbol::Y90,
            GateSymbol::YMinus90,
            GateSymbol::Z90,
            GateSymbol::ZMinus90,
            GateSymbol::Rotation(1.1, 0.4),
            GateSymbol::RotationX(0.7),
            GateSymbol::RotationY(-0.2),
            GateSymbol::RotationZ(2.9),
            GateSymbol::Universal(0.5, 1.0, -0.3),
            GateSymbol::Swap,
            GateSymbol::ISwap,
            GateSymbol::ISwapDagger,
            GateSymbol::ControlX,
            GateSymbol::ControlZ,
            GateSymbol::Toffoli,
            GateSymbol::controlled(GateSymbol::Hadamard, 1),
            GateSymbol::controlled(GateSymbol::ISwap, 1),
        ];
        for symbol in &symbols {
            assert_unitary(symbol);
        }
    }

    #[test]
    fn test_inverse_is_dagger() {
        let symbols = [
            GateSymbol::Hadamard,
            GateSymbol::PhaseShift(0.9),
            GateSymbol::Pi8,
            GateSymbol::X90,
            GateSymbol::YMinus90,
            GateSymbol::Rotation(1.3, -0.6),
            GateSymbol::RotationZ(0.4),
            GateSymbol::Universal(0.8, 0.2, 1.7),
            GateSymbol::ISwap,
            GateSymbol::Toffoli,
            GateSymbol::controlled(GateSymbol::PhaseShift(0.25), 2),
        ];
        for symbol in &symbols {
            let inv = symbol.inverse().matrix();
            assert!(
                approx_eq(&inv, &dagger(&symbol.matrix()), 1e-10),
                "inverse of {symbol} is not its dagger"
            );
        }
    }

    #[test]
    fn test_controlled_normalization() {
        assert_eq!(
            GateSymbol::controlled(GateSymbol::SigmaX, 1),
            GateSymbol::ControlX
        );
        assert_eq!(
            GateSymbol::controlled(GateSymbol::SigmaX, 2),
            GateSymbol::Toffoli
        );
        assert_eq!(
            GateSymbol::controlled(GateSymbol::SigmaZ, 1),
            GateSymbol::ControlZ
        );
        assert_eq!(
            GateSymbol::controlled(GateSymbol::ControlX, 1),
            GateSymbol::Toffoli
        );
        // Named controlled kernels fold into the wrap
        assert_eq!(
            GateSymbol::controlled(GateSymbol::ControlZ, 1),
            GateSymbol::Controlled {
                kernel: Box::new(GateSymbol::SigmaZ),
                control_count: 2
            }
        );
        assert_eq!(
            GateSymbol::controlled(GateSymbol::Toffoli, 1),
            GateSymbol::Controlled {
                kernel: Box::new(GateSymbol::SigmaX),
                control_count: 3
            }
        );
        // Nested wraps flatten
        let nested = GateSymbol::controlled(GateSymbol::controlled(GateSymbol::Hadamard, 1), 1);
        assert_eq!(
            nested,
            GateSymbol::Controlled {
                kernel: Box::new(GateSymbol::Hadamard),
                control_count: 2
            }
        );
    }

    #[test]
    fn test_control_x_matrix() {
        let cx = GateSymbol::ControlX.matrix();
        let one = Complex64::new(1.0, 0.0);
        assert_eq!(cx[[0, 0]], one);
        assert_eq!(cx[[1, 1]], one);
        assert_eq!(cx[[2, 3]], one);
        assert_eq!(cx[[3, 2]], one);
    }

    #[test]
    fn test_control_embedding_matches_projector_form() {
        // CX = |0><0| kron I + |1><1| kron X, control in the high bit
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let p0 = array![[one, zero], [zero, zero]];
        let p1 = array![[zero, zero], [zero, one]];
        let expected = operator::kron(&p0, &operator::identity(2))
            + operator::kron(&p1, &GateSymbol::SigmaX.matrix());
        assert!(approx_eq(&GateSymbol::ControlX.matrix(), &expected, 1e-12));
    }

    #[test]
    fn test_ninety_degree_aliases() {
        assert!(approx_eq(
            &GateSymbol::X90.matrix(),
            &GateSymbol::RotationX(FRAC_PI_2).matrix(),
            1e-12
        ));
        assert!(approx_eq(
            &GateSymbol::Z90.matrix(),
            &GateSymbol::RotationZ(FRAC_PI_2).matrix(),
            1e-12
        ));
    }

    #[test]
    fn test_universal_covers_named_rotations() {
        // U(theta, -pi/2, pi/2) = Rx(theta)
        let rx = GateSymbol::RotationX(0.77).matrix();
        let u = GateSymbol::Universal(0.77, -FRAC_PI_2, FRAC_PI_2).matrix();
        assert!(crate::operator::approx_eq_up_to_phase(&u, &rx, 1e-10));
        // U(0, 0, lambda) = PhaseShift(lambda)
        let p = GateSymbol::PhaseShift(1.2).matrix();
        let u = GateSymbol::Universal(0.0, 0.0, 1.2).matrix();
        assert!(approx_eq(&u, &p, 1e-10));
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = GateSymbol::RotationZ(1.0);
        let b = GateSymbol::RotationZ(1.0 + 1e-9);
        assert!(a.approx_eq(&b, 1e-6));
        assert!(!a.approx_eq(&b, 1e-12));
        assert!(!a.approx_eq(&GateSymbol::PhaseShift(1.0), 1e-6));
    }

    #[test]
    fn test_parameters() {
        assert_eq!(GateSymbol::Universal(0.1, 0.2, 0.3).parameters(), vec![
            0.1, 0.2, 0.3
        ]);
        assert!(GateSymbol::Toffoli.parameters().is_empty());
        assert_eq!(
            GateSymbol::controlled(GateSymbol::PhaseShift(0.5), 1).parameters(),
            vec![0.5]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", GateSymbol::Hadamard), "hadamard");
        assert_eq!(format!("{}", GateSymbol::PhaseShift(PI)), "phase_shift(3.1416)");
        assert_eq!(
            format!("{}", GateSymbol::controlled(GateSymbol::SigmaY, 1)),
            "controlled(sigma_y, 1)"
        );
    }
}
