//! Result types requested from a backend alongside the circuit.
//!
//! A result type declares what the backend must report for a circuit
//! instead of (or in addition to) raw shot counts. Backends that support
//! exact execution can fill these values analytically when no shots are
//! requested.

use serde::{Deserialize, Serialize};

use crate::qubit::QubitId;

/// A quantity requested from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultType {
    /// Probability of each computational basis outcome on `targets`.
    ///
    /// Outcomes are indexed with the first target as the most significant
    /// bit, so for targets `[q0, q1]` index 1 is the outcome `01`
    /// (`q0 = 0`, `q1 = 1`). An empty target list means every qubit of the
    /// circuit in ascending order.
    Probability {
        /// Measured qubits.
        targets: Vec<QubitId>,
    },
}

impl ResultType {
    /// Probability over the given target qubits.
    pub fn probability(targets: impl IntoIterator<Item = QubitId>) -> Self {
        ResultType::Probability {
            targets: targets.into_iter().collect(),
        }
    }

    /// Targets resolved against a circuit of `num_qubits` qubits.
    pub fn resolved_targets(&self, num_qubits: usize) -> Vec<QubitId> {
        match self {
            ResultType::Probability { targets } if targets.is_empty() => {
                (0..num_qubits as u32).map(QubitId).collect()
            }
            ResultType::Probability { targets } => targets.clone(),
        }
    }

    /// Number of values the backend reports for this result type.
    pub fn num_outcomes(&self, num_qubits: usize) -> usize {
        1 << self.resolved_targets(num_qubits).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_targets_cover_all_qubits() {
        let rt = ResultType::probability([]);
        assert_eq!(
            rt.resolved_targets(3),
            vec![QubitId(0), QubitId(1), QubitId(2)]
        );
        assert_eq!(rt.num_outcomes(3), 8);
    }

    #[test]
    fn test_explicit_targets_preserve_order() {
        let rt = ResultType::probability([QubitId(4), QubitId(2)]);
        assert_eq!(rt.resolved_targets(5), vec![QubitId(4), QubitId(2)]);
        assert_eq!(rt.num_outcomes(5), 4);
    }

    #[test]
    fn test_serde_tagging() {
        let rt = ResultType::probability([QubitId(0), QubitId(1)]);
        let json = serde_json::to_string(&rt).unwrap();
        assert_eq!(json, r#"{"type":"probability","targets":[0,1]}"#);
    }
}
