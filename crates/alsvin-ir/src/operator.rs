//! Dense complex operators.
//!
//! Gate matrices are dense `2^n x 2^n` arrays over [`Complex64`]. For a
//! multi-qubit symbol the first operand is the most significant bit of the
//! basis-state index, so `control_x` reads as the familiar
//! `|c t> -> |c, t xor c>` block matrix.

use ndarray::Array2;
use num_complex::Complex64;

/// A dense unitary matrix.
pub type Operator = Array2<Complex64>;

/// Identity operator of the given dimension.
pub fn identity(dim: usize) -> Operator {
    Array2::eye(dim)
}

/// Conjugate transpose.
pub fn dagger(op: &Operator) -> Operator {
    op.t().mapv(|c| c.conj())
}

/// Kronecker product, first factor most significant.
pub fn kron(a: &Operator, b: &Operator) -> Operator {
    ndarray::linalg::kron(a, b)
}

/// Entrywise comparison within `atol`.
pub fn approx_eq(a: &Operator, b: &Operator, atol: f64) -> bool {
    a.shape() == b.shape()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).norm() <= atol)
}

/// Comparison up to a global phase factor of unit modulus.
///
/// The phase is fixed from the largest-magnitude entry of `a`; two zero
/// operators compare equal.
pub fn approx_eq_up_to_phase(a: &Operator, b: &Operator, atol: f64) -> bool {
    if a.shape() != b.shape() {
        return false;
    }
    let mut pivot = None;
    let mut best = atol;
    for (x, y) in a.iter().zip(b.iter()) {
        if x.norm() > best {
            best = x.norm();
            pivot = Some((*x, *y));
        }
    }
    let Some((x, y)) = pivot else {
        // a is numerically zero; b must be too
        return b.iter().all(|y| y.norm() <= atol);
    };
    if y.norm() <= atol {
        return false;
    }
    let ratio = y / x;
    let phase = ratio / ratio.norm();
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x * phase - y).norm() <= atol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_and_dagger() {
        let id = identity(2);
        assert_eq!(id[[0, 0]], Complex64::new(1.0, 0.0));
        assert_eq!(id[[0, 1]], Complex64::new(0.0, 0.0));
        assert!(approx_eq(&dagger(&id), &id, 1e-12));
    }

    #[test]
    fn test_kron_dimensions() {
        let a = identity(2);
        let b = identity(4);
        assert_eq!(kron(&a, &b).shape(), &[8, 8]);
    }

    #[test]
    fn test_up_to_phase() {
        let id = identity(2);
        let phased = id.mapv(|c| c * Complex64::from_polar(1.0, 0.7));
        assert!(!approx_eq(&id, &phased, 1e-9));
        assert!(approx_eq_up_to_phase(&id, &phased, 1e-9));
    }
}
