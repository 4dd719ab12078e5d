//! Benchmarks for circuit construction
//!
//! Run with: cargo bench -p alsvin-ir

use alsvin_ir::{QuantumCircuit, QubitId};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f64::consts::PI;

/// Benchmark adding gates to a circuit
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = QuantumCircuit::with_size(10, 0);
        b.iter(|| {
            circuit.h(black_box(QubitId(1))).unwrap();
        });
    });

    group.bench_function("rotation_z_gate", |b| {
        let mut circuit = QuantumCircuit::with_size(10, 0);
        b.iter(|| {
            circuit
                .rotation_z(black_box(PI / 4.0), black_box(QubitId(1)))
                .unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = QuantumCircuit::with_size(10, 0);
        b.iter(|| {
            circuit
                .cx(black_box(QubitId(1)), black_box(QubitId(2)))
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark GHZ state circuit creation
fn bench_ghz_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_circuit");

    for num_qubits in &[3, 5, 10, 20, 50] {
        group.bench_with_input(
            BenchmarkId::new("create", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| black_box(QuantumCircuit::ghz(n).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark circuit depth calculation
fn bench_circuit_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_depth");

    for num_qubits in &[5u32, 10, 20, 50] {
        let mut circuit = QuantumCircuit::with_size(*num_qubits, 0);

        for _layer in 0..5 {
            for i in 1..=*num_qubits {
                circuit.h(QubitId(i)).unwrap();
            }
            for i in (1..*num_qubits).step_by(2) {
                circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
            }
        }

        group.bench_with_input(
            BenchmarkId::new("depth", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.depth()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gate_addition,
    bench_ghz_circuit,
    bench_circuit_depth,
);

criterion_main!(benches);
