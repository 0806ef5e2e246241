//! Execution results.
//!
//! An [`ExecutionResult`] carries raw shot [`Counts`] plus the values of
//! any result types the circuit declared. For exact (zero-shot) execution
//! the counts are empty and only the result-type values are populated.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use qbell_ir::ResultType;

/// Measurement counts keyed by bitstring.
///
/// Bitstrings list qubits in ascending index order, so the first
/// character is qubit 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from `(bitstring, count)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u64)>) -> Self {
        let mut counts = Self::new();
        for (bitstring, count) in pairs {
            counts.insert(bitstring, count);
        }
        counts
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Observations of `bitstring`, zero if never seen.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Outcomes sorted by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut entries: Vec<_> = self.counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.sorted().into_iter().next()
    }

    /// Relative frequency of every outcome.
    pub fn probabilities(&self) -> FxHashMap<String, f64> {
        let total = self.total_shots();
        if total == 0 {
            return FxHashMap::default();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total as f64))
            .collect()
    }
}

/// The value a backend reported for one declared result type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTypeValue {
    /// The requested result type.
    pub result_type: ResultType,
    /// Reported values; for probabilities, one entry per outcome index.
    pub value: Vec<f64>,
}

/// Result of executing a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Shot counts; empty for exact execution.
    pub counts: Counts,
    /// Number of shots requested.
    pub shots: u32,
    /// Values of the circuit's declared result types, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result_types: Vec<ResultTypeValue>,
    /// Wall-clock execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Backend-specific metadata.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl ExecutionResult {
    /// Create a new result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            result_types: vec![],
            execution_time_ms: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Attach result-type values.
    pub fn with_result_types(mut self, values: Vec<ResultTypeValue>) -> Self {
        self.result_types = values;
        self
    }

    /// Set the execution time.
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Attach backend metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Values of the first probability result type, if one was declared.
    pub fn probabilities(&self) -> Option<&[f64]> {
        self.result_types
            .iter()
            .find(|v| matches!(v.result_type, ResultType::Probability { .. }))
            .map(|v| v.value.as_slice())
    }

    /// Whether this result came from exact (zero-shot) execution.
    pub fn is_exact(&self) -> bool {
        self.shots == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbell_ir::QubitId;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("11", 4);
        counts.insert("00", 3);

        assert_eq!(counts.get("00"), 6);
        assert_eq!(counts.get("11"), 4);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 10);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_counts_sorted_and_most_frequent() {
        let counts = Counts::from_pairs([("01", 5u64), ("00", 5), ("11", 9)]);
        let sorted = counts.sorted();
        assert_eq!(sorted[0].0, "11");
        assert_eq!(sorted[1].0, "00");
        assert_eq!(sorted[2].0, "01");
        assert_eq!(counts.most_frequent().map(|(k, _)| k.as_str()), Some("11"));
    }

    #[test]
    fn test_counts_probabilities() {
        let counts = Counts::from_pairs([("00", 485u64), ("11", 515)]);
        let probs = counts.probabilities();
        assert!((probs["00"] - 0.485).abs() < 1e-12);
        assert!((probs["11"] - 0.515).abs() < 1e-12);
        assert!(Counts::new().probabilities().is_empty());
    }

    #[test]
    fn test_execution_result_probabilities() {
        let value = ResultTypeValue {
            result_type: ResultType::probability([QubitId(0), QubitId(1)]),
            value: vec![0.5, 0.0, 0.0, 0.5],
        };
        let result = ExecutionResult::new(Counts::new(), 0)
            .with_result_types(vec![value])
            .with_execution_time(3);

        assert!(result.is_exact());
        assert_eq!(result.probabilities(), Some(&[0.5, 0.0, 0.0, 0.5][..]));
        assert_eq!(result.execution_time_ms, Some(3));
    }

    #[test]
    fn test_execution_result_without_result_types() {
        let result = ExecutionResult::new(Counts::from_pairs([("0", 3u64)]), 3);
        assert!(result.probabilities().is_none());
        assert!(!result.is_exact());
    }
}
