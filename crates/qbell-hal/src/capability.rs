//! Backend capability introspection.
//!
//! [`Capabilities`] describes what a backend can run: qubit count, supported
//! gates, shot limits, and whether exact (zero-shot) execution is available.
//! Backends cache it at construction and [`crate::Backend::validate`]
//! checks circuits against it.

use serde::{Deserialize, Serialize};

use qbell_ir::Circuit;

/// Hardware capabilities of a quantum backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set.
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) vs real hardware (`false`).
    pub is_simulator: bool,
    /// Whether `shots = 0` requests exact result-type values.
    pub supports_exact: bool,
}

impl Capabilities {
    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 100_000,
            is_simulator: true,
            supports_exact: true,
        }
    }

    /// Reasons `circuit` cannot run here; empty when it fits.
    pub fn check(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = vec![];

        if circuit.num_qubits() > self.num_qubits as usize {
            reasons.push(format!(
                "circuit uses {} qubits, backend has {}",
                circuit.num_qubits(),
                self.num_qubits
            ));
        }

        let mut unsupported: Vec<_> = circuit
            .instructions()
            .iter()
            .map(qbell_ir::Instruction::name)
            .filter(|name| !self.gate_set.contains(name))
            .collect();
        unsupported.sort_unstable();
        unsupported.dedup();
        for name in unsupported {
            reasons.push(format!("gate '{name}' is not supported"));
        }

        reasons
    }
}

/// Supported gate operations, by lowercase gate name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
}

impl GateSet {
    /// Every gate the qbell IR can express.
    pub fn universal() -> Self {
        Self {
            single_qubit: ["x", "y", "z", "h", "rx", "ry", "rz"]
                .into_iter()
                .map(String::from)
                .collect(),
            two_qubit: ["cx", "cz"].into_iter().map(String::from).collect(),
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate) || self.two_qubit.iter().any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbell_ir::QubitId;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20);
        assert_eq!(caps.num_qubits, 20);
        assert!(caps.is_simulator);
        assert!(caps.supports_exact);
        assert!(caps.gate_set.contains("ry"));
        assert!(caps.gate_set.contains("cx"));
        assert!(!caps.gate_set.contains("ccx"));
    }

    #[test]
    fn test_check_reports_size_and_gates() {
        let caps = Capabilities {
            gate_set: GateSet {
                single_qubit: vec!["h".into()],
                two_qubit: vec![],
            },
            ..Capabilities::simulator(2)
        };

        let mut circuit = qbell_ir::Circuit::with_size("wide", 3);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(2)).unwrap();

        let reasons = caps.check(&circuit);
        assert_eq!(reasons.len(), 2);
        assert!(reasons[0].contains("3 qubits"));
        assert!(reasons[1].contains("'cx'"));
    }

    #[test]
    fn test_check_accepts_bell() {
        let caps = Capabilities::simulator(2);
        assert!(caps.check(&qbell_ir::Circuit::bell().unwrap()).is_empty());
    }
}
