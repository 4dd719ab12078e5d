//! 2x2 unitary algebra for single-qubit gate rewriting.
//!
//! Backs the compression and controlled-gate decomposition passes:
//! ZYZ Euler angles turn an accumulated product back into a universal
//! gate, and the principal square root drives the recursive
//! multi-control construction.

use num_complex::Complex64;
use std::f64::consts::PI;

use alsvin_ir::GateSymbol;

/// Tolerance for floating point comparisons.
pub(crate) const EPSILON: f64 = 1e-10;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::new(
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
        )
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        let exp_neg = Complex64::from_polar(1.0, -theta / 2.0);
        let exp_pos = Complex64::from_polar(1.0, theta / 2.0);
        Self::new(
            exp_neg,
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            exp_pos,
        )
    }

    /// Create a phase gate P(lambda).
    pub fn p(lambda: f64) -> Self {
        let phase = Complex64::from_polar(1.0, lambda);
        Self::new(
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            phase,
        )
    }

    /// Create a U gate U(theta, phi, lambda).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Build the matrix of a single-qubit gate symbol.
    ///
    /// Returns `None` for multi-qubit symbols.
    pub fn from_symbol(symbol: &GateSymbol) -> Option<Self> {
        if symbol.num_qubits() != 1 {
            return None;
        }
        let m = symbol.matrix();
        Some(Self::new(m[[0, 0]], m[[0, 1]], m[[1, 0]], m[[1, 1]]))
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Check if this is approximately identity (up to global phase).
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;

        // Off-diagonal should be zero
        if b.norm() > EPSILON || c.norm() > EPSILON {
            return false;
        }

        // Diagonal elements should be equal
        (a - d).norm() < EPSILON
    }

    /// Get the global phase of this unitary.
    pub fn global_phase(&self) -> f64 {
        let det = self.data[0] * self.data[3] - self.data[1] * self.data[2];
        det.arg() / 2.0
    }

    /// Decompose into RZ(alpha) * RY(beta) * RZ(gamma) * `global_phase`.
    ///
    /// Returns (alpha, beta, gamma, `global_phase`).
    /// This is the ZYZ Euler decomposition.
    pub fn zyz_decomposition(&self) -> (f64, f64, f64, f64) {
        let [a, b, c, d] = self.data;

        let det = a * d - b * c;
        let global_phase = det.arg() / 2.0;

        // Remove global phase to get SU(2) matrix
        let phase_factor = Complex64::from_polar(1.0, -global_phase);
        let a = a * phase_factor;
        let b = b * phase_factor;
        let c = c * phase_factor;

        // ZYZ decomposition:
        // U = Rz(alpha) * Ry(beta) * Rz(gamma)
        //
        // For SU(2): U = [[cos(b/2)*e^(-i(a+g)/2), -sin(b/2)*e^(-i(a-g)/2)],
        //                 [sin(b/2)*e^(i(a-g)/2),   cos(b/2)*e^(i(a+g)/2)]]
        let beta = 2.0 * a.norm().acos().clamp(0.0, PI);

        if beta.abs() < EPSILON {
            // beta ≈ 0: pure Z rotation
            let alpha_plus_gamma = -2.0 * a.arg();
            return (
                alpha_plus_gamma / 2.0,
                0.0,
                alpha_plus_gamma / 2.0,
                global_phase,
            );
        }

        if (beta - PI).abs() < EPSILON {
            // beta ≈ π: anti-diagonal, only alpha - gamma is determined
            let alpha_minus_gamma = -2.0 * (-b).arg();
            return (
                alpha_minus_gamma / 2.0,
                PI,
                -alpha_minus_gamma / 2.0,
                global_phase,
            );
        }

        // General case:
        // a = cos(beta/2) * e^(-i*(alpha+gamma)/2)
        // c = sin(beta/2) * e^(i*(alpha-gamma)/2)
        let alpha_plus_gamma = -2.0 * a.arg();
        let alpha_minus_gamma = 2.0 * c.arg();

        let alpha = f64::midpoint(alpha_plus_gamma, alpha_minus_gamma);
        let gamma = (alpha_plus_gamma - alpha_minus_gamma) / 2.0;

        (alpha, beta, gamma, global_phase)
    }

    /// The principal square root: a unitary V with V * V = self.
    ///
    /// Works through the axis-angle form: after factoring out the global
    /// phase, SU(2) matrices are cos(t/2)*I - i*sin(t/2)*(n . sigma), and
    /// halving t halves the rotation.
    pub fn sqrt(&self) -> Self {
        let [a, b, _, _] = self.data;

        let det = self.data[0] * self.data[3] - self.data[1] * self.data[2];
        let alpha = det.arg() / 2.0;
        let phase_factor = Complex64::from_polar(1.0, -alpha);
        let s00 = a * phase_factor;
        let s01 = b * phase_factor;

        // S = cos(t/2)*I - i*sin(t/2)*(nx*X + ny*Y + nz*Z) gives
        //   s00 = cos(t/2) - i*sin(t/2)*nz
        //   s01 = -sin(t/2)*ny - i*sin(t/2)*nx
        let c = s00.re;
        let sx = -s01.im;
        let sy = -s01.re;
        let sz = -s00.im;
        let s_norm = (sx * sx + sy * sy + sz * sz).sqrt();

        let half_angle = s_norm.atan2(c);
        let (nx, ny, nz) = if s_norm < EPSILON {
            // Rotation angle ≈ 0, axis is arbitrary
            (0.0, 0.0, 1.0)
        } else {
            (sx / s_norm, sy / s_norm, sz / s_norm)
        };

        let cq = (half_angle / 2.0).cos();
        let sq = (half_angle / 2.0).sin();
        let root = Self::new(
            Complex64::new(cq, -sq * nz),
            Complex64::new(-sq * ny, -sq * nx),
            Complex64::new(sq * ny, -sq * nx),
            Complex64::new(cq, sq * nz),
        );

        let half_phase = Complex64::from_polar(1.0, alpha / 2.0);
        let [ra, rb, rc, rd] = root.data;
        Self::new(ra * half_phase, rb * half_phase, rc * half_phase, rd * half_phase)
    }

    /// Normalize angles to (-pi, pi].
    pub fn normalize_angle(angle: f64) -> f64 {
        if angle.is_nan() || angle.is_infinite() {
            return 0.0;
        }
        let mut a = angle.rem_euclid(2.0 * PI);
        if a > PI {
            a -= 2.0 * PI;
        }
        a
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}
