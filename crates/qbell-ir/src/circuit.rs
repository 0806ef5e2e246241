//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;
use crate::result_type::ResultType;

/// A quantum circuit.
///
/// This provides a high-level API for building quantum circuits,
/// with convenient methods for common gates and result-type declarations.
/// Gate methods validate their operands and return `&mut Self` so calls
/// can be chained with `?`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits in the register.
    num_qubits: u32,
    /// Gate instructions in program order.
    instructions: Vec<Instruction>,
    /// Quantities the backend is asked to report.
    result_types: Vec<ResultType>,
}

impl Circuit {
    /// Create a new empty circuit with no qubits.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, 0)
    }

    /// Create a circuit with a given number of qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
            result_types: vec![],
        }
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Append an instruction after validating arity and operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = instruction.name();

        let expected = instruction.gate.num_qubits();
        let got = instruction.qubits.len() as u32;
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.to_string(),
                expected,
                got,
            });
        }

        self.check_qubits(&instruction.qubits, Some(gate_name))?;

        self.instructions.push(instruction);
        Ok(self)
    }

    fn check_qubits(&self, qubits: &[QubitId], gate_name: Option<&str>) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        for &qubit in qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.map(str::to_string),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.map(str::to_string),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            control,
            target,
        ))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(
            StandardGate::CZ,
            control,
            target,
        ))
    }

    // =========================================================================
    // Composite operations
    // =========================================================================

    /// Entangle two qubits into (|00⟩ + |11⟩)/√2.
    ///
    /// Applies `H` on `qubit0` followed by `CX(qubit0, qubit1)`. This is the
    /// resource state of the CHSH experiment.
    pub fn bell_singlet(&mut self, qubit0: QubitId, qubit1: QubitId) -> IrResult<&mut Self> {
        self.check_qubits(&[qubit0, qubit1], Some("bell_singlet"))?;
        self.h(qubit0)?.cx(qubit0, qubit1)
    }

    // =========================================================================
    // Result types
    // =========================================================================

    /// Request outcome probabilities over `targets`.
    ///
    /// The first target is the most significant bit of the outcome index.
    pub fn probability(
        &mut self,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let targets: Vec<_> = targets.into_iter().collect();
        self.check_qubits(&targets, None)?;
        self.result_types.push(ResultType::Probability { targets });
        Ok(self)
    }

    /// Request outcome probabilities over every qubit.
    pub fn probability_all(&mut self) -> IrResult<&mut Self> {
        self.result_types
            .push(ResultType::Probability { targets: vec![] });
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Gate instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Declared result types.
    pub fn result_types(&self) -> &[ResultType] {
        &self.result_types
    }

    /// Number of gate operations.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Circuit depth: the longest chain of gates sharing a qubit.
    pub fn depth(&self) -> usize {
        let mut front: FxHashMap<QubitId, usize> = FxHashMap::default();
        let mut max_depth = 0;

        for inst in &self.instructions {
            let layer = inst
                .qubits
                .iter()
                .map(|q| front.get(q).copied().unwrap_or(0))
                .max()
                .unwrap_or(0)
                + 1;
            for &q in &inst.qubits {
                front.insert(q, layer);
            }
            max_depth = max_depth.max(layer);
        }

        max_depth
    }

    /// Count of each gate by name.
    pub fn gate_counts(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit with probabilities over both qubits.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);

        circuit.bell_singlet(q0, q1)?.probability([q0, q1])?;

        Ok(circuit)
    }
}
