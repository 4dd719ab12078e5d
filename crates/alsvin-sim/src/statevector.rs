//! Statevector evolution for the gate catalog.
//!
//! Amplitudes are indexed by basis state with qubit 1 in the least
//! significant bit, so `amplitudes[0b10]` is the amplitude of qubit 2
//! being on while qubit 1 is off. Control qubits become an index mask:
//! amplitude pairs are only mixed where every control bit is set, which
//! covers the named controlled gates and arbitrary `Controlled` wraps
//! with the same loops.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use alsvin_ir::{GateSymbol, Instruction, QubitId};

/// Full statevector of a qubit register.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// Amplitudes, indexed by basis state.
    amplitudes: Vec<Complex64>,
    /// Number of qubits in the register.
    num_qubits: u32,
}

impl Statevector {
    /// Create a register in the all-zeros state.
    pub fn new(num_qubits: u32) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1usize << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Number of qubits in the register.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Probability of observing `outcome` across the whole register.
    pub fn probability(&self, outcome: usize) -> f64 {
        self.amplitudes[outcome].norm_sqr()
    }

    /// Apply one instruction to the state.
    ///
    /// Readouts leave the state untouched; sampling is a separate step.
    pub fn apply(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Gate {
                symbol,
                targets,
                controls,
            } => {
                let control_mask = controls
                    .iter()
                    .fold(0usize, |acc, qubit| acc | mask(*qubit));
                self.apply_symbol(symbol, targets, control_mask);
            }
            Instruction::Readout { .. } => {}
        }
    }

    /// Sample a basis state from the register's distribution.
    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        let draw: f64 = rng.r#gen();
        let mut cumulative = 0.0;
        for (outcome, amplitude) in self.amplitudes.iter().enumerate() {
            cumulative += amplitude.norm_sqr();
            if draw < cumulative {
                return outcome;
            }
        }
        // Rounding can leave the cumulative sum fractionally below 1.
        self.amplitudes.len() - 1
    }

    /// Compare against another state up to a global phase.
    pub fn approx_eq_up_to_phase(&self, other: &Statevector, atol: f64) -> bool {
        if self.num_qubits != other.num_qubits {
            return false;
        }
        let mut pivot = None;
        let mut best = atol;
        for (x, y) in self.amplitudes.iter().zip(&other.amplitudes) {
            if x.norm() > best {
                best = x.norm();
                pivot = Some((*x, *y));
            }
        }
        let Some((x, y)) = pivot else {
            // self is numerically zero; other must be too
            return other.amplitudes.iter().all(|y| y.norm() <= atol);
        };
        if y.norm() <= atol {
            return false;
        }
        let ratio = y / x;
        let phase = ratio / ratio.norm();
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .all(|(x, y)| (phase * x - y).norm() <= atol)
    }

    fn apply_symbol(&mut self, symbol: &GateSymbol, targets: &[QubitId], control_mask: usize) {
        match symbol {
            GateSymbol::Identity => {}
            GateSymbol::SigmaX => self.apply_x(targets[0], control_mask),
            GateSymbol::SigmaY => self.apply_y(targets[0], control_mask),
            GateSymbol::SigmaZ => self.apply_z(targets[0], control_mask),
            GateSymbol::Hadamard => self.apply_h(targets[0], control_mask),
            GateSymbol::PhaseShift(phi) => self.apply_phase(*phi, targets[0], control_mask),
            GateSymbol::Pi8 => self.apply_phase(FRAC_PI_4, targets[0], control_mask),
            GateSymbol::Pi8Dagger => self.apply_phase(-FRAC_PI_4, targets[0], control_mask),
            GateSymbol::X90 => self.apply_rotation(FRAC_PI_2, 0.0, targets[0], control_mask),
            GateSymbol::XMinus90 => self.apply_rotation(-FRAC_PI_2, 0.0, targets[0], control_mask),
            GateSymbol::Y90 => {
                self.apply_rotation(FRAC_PI_2, FRAC_PI_2, targets[0], control_mask);
            }
            GateSymbol::YMinus90 => {
                self.apply_rotation(-FRAC_PI_2, FRAC_PI_2, targets[0], control_mask);
            }
            GateSymbol::Z90 => self.apply_rz(FRAC_PI_2, targets[0], control_mask),
            GateSymbol::ZMinus90 => self.apply_rz(-FRAC_PI_2, targets[0], control_mask),
            GateSymbol::Rotation(theta, phi) => {
                self.apply_rotation(*theta, *phi, targets[0], control_mask);
            }
            GateSymbol::RotationX(theta) => {
                self.apply_rotation(*theta, 0.0, targets[0], control_mask);
            }
            GateSymbol::RotationY(theta) => {
                self.apply_rotation(*theta, FRAC_PI_2, targets[0], control_mask);
            }
            GateSymbol::RotationZ(theta) => self.apply_rz(*theta, targets[0], control_mask),
            GateSymbol::Universal(theta, phi, lambda) => {
                self.apply_universal(*theta, *phi, *lambda, targets[0], control_mask);
            }
            GateSymbol::Swap => self.apply_swap(targets[0], targets[1], control_mask),
            GateSymbol::ISwap => {
                self.apply_iswap(targets[0], targets[1], control_mask, Complex64::new(0.0, 1.0));
            }
            GateSymbol::ISwapDagger => {
                self.apply_iswap(targets[0], targets[1], control_mask, Complex64::new(0.0, -1.0));
            }
            GateSymbol::ControlX => {
                self.apply_x(targets[1], control_mask | mask(targets[0]));
            }
            GateSymbol::ControlZ => {
                self.apply_z(targets[1], control_mask | mask(targets[0]));
            }
            GateSymbol::Toffoli => {
                self.apply_x(targets[2], control_mask | mask(targets[0]) | mask(targets[1]));
            }
            GateSymbol::Controlled { kernel, .. } => {
                // Instruction controls are already folded into the mask.
                self.apply_symbol(kernel, targets, control_mask);
            }
        }
    }

    // ========================================================================
    // Gate application
    // ========================================================================

    fn apply_x(&mut self, target: QubitId, control_mask: usize) {
        let mask = mask(target);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & control_mask == control_mask {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, target: QubitId, control_mask: usize) {
        let im = Complex64::new(0.0, 1.0);
        let mask = mask(target);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & control_mask == control_mask {
                let j = i | mask;
                let low = self.amplitudes[i];
                self.amplitudes[i] = -im * self.amplitudes[j];
                self.amplitudes[j] = im * low;
            }
        }
    }

    fn apply_z(&mut self, target: QubitId, control_mask: usize) {
        let mask = mask(target);
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 && i & control_mask == control_mask {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, target: QubitId, control_mask: usize) {
        let mask = mask(target);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & control_mask == control_mask {
                let j = i | mask;
                let low = self.amplitudes[i];
                let high = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (low + high);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (low - high);
            }
        }
    }

    fn apply_phase(&mut self, phi: f64, target: QubitId, control_mask: usize) {
        let factor = Complex64::from_polar(1.0, phi);
        let mask = mask(target);
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 && i & control_mask == control_mask {
                self.amplitudes[i] *= factor;
            }
        }
    }

    fn apply_rz(&mut self, theta: f64, target: QubitId, control_mask: usize) {
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        let mask = mask(target);
        for i in 0..self.amplitudes.len() {
            if i & control_mask == control_mask {
                self.amplitudes[i] *= if i & mask == 0 { phase_0 } else { phase_1 };
            }
        }
    }

    /// Rotation by `theta` about the axis `cos(phi) X + sin(phi) Y`.
    fn apply_rotation(&mut self, theta: f64, phi: f64, target: QubitId, control_mask: usize) {
        let im = Complex64::new(0.0, 1.0);
        let cos = Complex64::new((theta / 2.0).cos(), 0.0);
        let sin = (theta / 2.0).sin();
        let off_low = -im * Complex64::from_polar(sin, -phi);
        let off_high = -im * Complex64::from_polar(sin, phi);
        let mask = mask(target);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & control_mask == control_mask {
                let j = i | mask;
                let low = self.amplitudes[i];
                let high = self.amplitudes[j];
                self.amplitudes[i] = cos * low + off_low * high;
                self.amplitudes[j] = off_high * low + cos * high;
            }
        }
    }

    fn apply_universal(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        target: QubitId,
        control_mask: usize,
    ) {
        let cos = (theta / 2.0).cos();
        let sin = (theta / 2.0).sin();
        let m00 = Complex64::new(cos, 0.0);
        let m01 = -Complex64::from_polar(sin, lambda);
        let m10 = Complex64::from_polar(sin, phi);
        let m11 = Complex64::from_polar(cos, phi + lambda);
        let mask = mask(target);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & control_mask == control_mask {
                let j = i | mask;
                let low = self.amplitudes[i];
                let high = self.amplitudes[j];
                self.amplitudes[i] = m00 * low + m01 * high;
                self.amplitudes[j] = m10 * low + m11 * high;
            }
        }
    }

    fn apply_swap(&mut self, a: QubitId, b: QubitId, control_mask: usize) {
        let mask_a = mask(a);
        let mask_b = mask(b);
        for i in 0..self.amplitudes.len() {
            if i & mask_a != 0 && i & mask_b == 0 && i & control_mask == control_mask {
                let j = (i & !mask_a) | mask_b;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_iswap(&mut self, a: QubitId, b: QubitId, control_mask: usize, factor: Complex64) {
        let mask_a = mask(a);
        let mask_b = mask(b);
        for i in 0..self.amplitudes.len() {
            if i & mask_a != 0 && i & mask_b == 0 && i & control_mask == control_mask {
                let j = (i & !mask_a) | mask_b;
                let high = self.amplitudes[i];
                self.amplitudes[i] = factor * self.amplitudes[j];
                self.amplitudes[j] = factor * high;
            }
        }
    }
}

/// Index mask selecting the qubit's bit.
fn mask(qubit: QubitId) -> usize {
    1usize << qubit.offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_ir::{BitId, QuantumCircuit};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn run(circuit: &QuantumCircuit) -> Statevector {
        let mut state = Statevector::new(circuit.qubit_count());
        for instruction in circuit.instructions() {
            state.apply(instruction);
        }
        state
    }

    #[test]
    fn test_starts_in_the_all_zeros_state() {
        let state = Statevector::new(2);
        assert!(approx_eq(state.amplitudes()[0], Complex64::new(1.0, 0.0)));
        for amplitude in &state.amplitudes()[1..] {
            assert!(approx_eq(*amplitude, Complex64::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_sigma_x_flips_its_qubit() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.x(QubitId(2)).unwrap();
        let state = run(&circuit);
        assert!(approx_eq(state.amplitudes()[0b10], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_hadamard_splits_the_amplitude() {
        let mut circuit = QuantumCircuit::with_size(1, 0);
        circuit.h(QubitId(1)).unwrap();
        let state = run(&circuit);
        assert!(approx_eq(
            state.amplitudes()[0],
            Complex64::new(FRAC_1_SQRT_2, 0.0)
        ));
        assert!(approx_eq(
            state.amplitudes()[1],
            Complex64::new(FRAC_1_SQRT_2, 0.0)
        ));
    }

    #[test]
    fn test_bell_pair_entangles() {
        let state = run(&QuantumCircuit::bell().unwrap());
        assert!(approx_eq(
            state.amplitudes()[0b00],
            Complex64::new(FRAC_1_SQRT_2, 0.0)
        ));
        assert!(approx_eq(
            state.amplitudes()[0b11],
            Complex64::new(FRAC_1_SQRT_2, 0.0)
        ));
        assert!(approx_eq(state.amplitudes()[0b01], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(state.amplitudes()[0b10], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_control_z_flips_the_joint_phase() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.h(QubitId(1)).unwrap();
        circuit.h(QubitId(2)).unwrap();
        circuit.cz(QubitId(1), QubitId(2)).unwrap();
        let state = run(&circuit);
        assert!(approx_eq(state.amplitudes()[0b00], Complex64::new(0.5, 0.0)));
        assert!(approx_eq(state.amplitudes()[0b01], Complex64::new(0.5, 0.0)));
        assert!(approx_eq(state.amplitudes()[0b10], Complex64::new(0.5, 0.0)));
        assert!(approx_eq(
            state.amplitudes()[0b11],
            Complex64::new(-0.5, 0.0)
        ));
    }

    #[test]
    fn test_swap_moves_an_excitation() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.x(QubitId(1)).unwrap();
        circuit.swap(QubitId(1), QubitId(2)).unwrap();
        let state = run(&circuit);
        assert!(approx_eq(state.amplitudes()[0b10], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_iswap_adds_a_quarter_phase() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.x(QubitId(1)).unwrap();
        circuit.iswap(QubitId(1), QubitId(2)).unwrap();
        let state = run(&circuit);
        assert!(approx_eq(state.amplitudes()[0b10], Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn test_iswap_dagger_undoes_iswap() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.h(QubitId(1)).unwrap();
        circuit.iswap(QubitId(1), QubitId(2)).unwrap();
        circuit.iswap_dagger(QubitId(1), QubitId(2)).unwrap();
        let state = run(&circuit);
        assert!(approx_eq(
            state.amplitudes()[0],
            Complex64::new(FRAC_1_SQRT_2, 0.0)
        ));
        assert!(approx_eq(
            state.amplitudes()[1],
            Complex64::new(FRAC_1_SQRT_2, 0.0)
        ));
    }

    #[test]
    fn test_toffoli_needs_both_controls() {
        let mut circuit = QuantumCircuit::with_size(3, 0);
        circuit.x(QubitId(1)).unwrap();
        circuit.toffoli(QubitId(1), QubitId(2), QubitId(3)).unwrap();
        circuit.x(QubitId(2)).unwrap();
        circuit.toffoli(QubitId(1), QubitId(2), QubitId(3)).unwrap();
        let state = run(&circuit);
        assert!(approx_eq(
            state.amplitudes()[0b111],
            Complex64::new(1.0, 0.0)
        ));
    }

    #[test]
    fn test_controlled_wrap_matches_its_mask() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.x(QubitId(1)).unwrap();
        circuit
            .controlled(GateSymbol::Hadamard, vec![QubitId(1)], vec![QubitId(2)])
            .unwrap();
        let state = run(&circuit);
        assert!(approx_eq(
            state.amplitudes()[0b01],
            Complex64::new(FRAC_1_SQRT_2, 0.0)
        ));
        assert!(approx_eq(
            state.amplitudes()[0b11],
            Complex64::new(FRAC_1_SQRT_2, 0.0)
        ));
    }

    #[test]
    fn test_rotation_z_phases_each_branch() {
        let mut circuit = QuantumCircuit::with_size(1, 0);
        circuit.h(QubitId(1)).unwrap();
        circuit.rotation_z(FRAC_PI_2, QubitId(1)).unwrap();
        let state = run(&circuit);
        assert!(approx_eq(
            state.amplitudes()[0],
            Complex64::from_polar(FRAC_1_SQRT_2, -FRAC_PI_4)
        ));
        assert!(approx_eq(
            state.amplitudes()[1],
            Complex64::from_polar(FRAC_1_SQRT_2, FRAC_PI_4)
        ));
    }

    #[test]
    fn test_readout_leaves_the_state_alone() {
        let mut state = Statevector::new(1);
        state.apply(&Instruction::readout(QubitId(1), BitId(1)));
        assert!(approx_eq(state.amplitudes()[0], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_sample_is_deterministic_on_a_point_mass() {
        let mut circuit = QuantumCircuit::with_size(2, 0);
        circuit.x(QubitId(1)).unwrap();
        let state = run(&circuit);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            assert_eq!(state.sample(&mut rng), 0b01);
        }
    }

    #[test]
    fn test_phase_equivalence_ignores_a_global_phase() {
        let mut circuit = QuantumCircuit::with_size(1, 0);
        circuit.h(QubitId(1)).unwrap();
        let state = run(&circuit);
        let mut phased = state.clone();
        for amplitude in &mut phased.amplitudes {
            *amplitude *= Complex64::from_polar(1.0, 1.25);
        }
        assert!(state.approx_eq_up_to_phase(&phased, 1e-9));
    }

    #[test]
    fn test_phase_equivalence_rejects_different_states() {
        let mut flipped = QuantumCircuit::with_size(1, 0);
        flipped.x(QubitId(1)).unwrap();
        let state = run(&flipped);
        assert!(!state.approx_eq_up_to_phase(&Statevector::new(1), 1e-9));
    }
}
