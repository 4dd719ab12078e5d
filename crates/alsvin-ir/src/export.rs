//! Flat circuit form for execution clients.
//!
//! A transpiled circuit is handed to the job-submission side as a plain
//! ordered list of `(symbol, qubits, bits, parameters)` tuples. Wire
//! encoding beyond JSON is the client's concern.

use serde::{Deserialize, Serialize};

use crate::circuit::QuantumCircuit;
use crate::gate::GateSymbol;
use crate::instruction::Instruction;

/// One instruction in flattened form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatInstruction {
    /// Symbol name; controlled wraps flatten to `controlled_<kernel>`.
    pub symbol: String,
    /// Qubit indices, controls first.
    pub qubits: Vec<u32>,
    /// Destination bit indices (readout only).
    pub bits: Vec<u32>,
    /// Gate parameters in declaration order.
    pub parameters: Vec<f64>,
}

/// Flatten a circuit into the tuple list consumed by execution clients.
pub fn flat_instructions(circuit: &QuantumCircuit) -> Vec<FlatInstruction> {
    circuit
        .instructions()
        .iter()
        .map(|instruction| match instruction {
            Instruction::Gate { symbol, .. } => FlatInstruction {
                symbol: symbol_name(symbol),
                qubits: instruction.qubits().iter().map(|q| q.0).collect(),
                bits: vec![],
                parameters: symbol.parameters(),
            },
            Instruction::Readout { qubit, bit } => FlatInstruction {
                symbol: "readout".to_string(),
                qubits: vec![qubit.0],
                bits: vec![bit.0],
                parameters: vec![],
            },
        })
        .collect()
}

/// Serialize the flattened circuit to JSON.
pub fn to_json(circuit: &QuantumCircuit) -> serde_json::Result<String> {
    serde_json::to_string(&flat_instructions(circuit))
}

fn symbol_name(symbol: &GateSymbol) -> String {
    match symbol {
        GateSymbol::Controlled { kernel, .. } => format!("controlled_{}", symbol_name(kernel)),
        other => other.name().to_string(),
    }
}
