//! Statistical post-processing of CHSH measurement results.
//!
//! Each of the four settings yields a distribution over the two-qubit
//! outcomes `00`, `01`, `10`, `11`. Its correlation is
//!
//! ```text
//! E = ((P00 + P11) − (P01 + P10)) / total
//! ```
//!
//! and the CHSH statistic is `S = E(a,b) − E(a,b') + E(a',b) + E(a',b')`.
//! Local hidden-variable models satisfy `|S| ≤ 2`; quantum mechanics
//! reaches `2√2`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChshError, ChshResult};

/// Classical bound of the CHSH statistic.
pub const CLASSICAL_BOUND: f64 = 2.0;

/// Quantum maximum of the CHSH statistic (Tsirelson's bound).
pub const TSIRELSON_BOUND: f64 = 2.0 * std::f64::consts::SQRT_2;

/// One of the four measurement settings, in the order circuits, tasks and
/// results are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasisSetting {
    /// (a, b)
    AB,
    /// (a, b')
    ABPrime,
    /// (a', b)
    APrimeB,
    /// (a', b')
    APrimeBPrime,
}

impl BasisSetting {
    /// All settings in basis order.
    pub const ALL: [BasisSetting; 4] = [
        BasisSetting::AB,
        BasisSetting::ABPrime,
        BasisSetting::APrimeB,
        BasisSetting::APrimeBPrime,
    ];

    /// Coefficient of this setting in the CHSH statistic.
    pub fn sign(self) -> f64 {
        match self {
            BasisSetting::ABPrime => -1.0,
            _ => 1.0,
        }
    }

    /// Short identifier used in circuit names.
    pub fn slug(self) -> &'static str {
        match self {
            BasisSetting::AB => "ab",
            BasisSetting::ABPrime => "abp",
            BasisSetting::APrimeB => "apb",
            BasisSetting::APrimeBPrime => "apbp",
        }
    }

    /// Position in basis order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BasisSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BasisSetting::AB => "a,b",
            BasisSetting::ABPrime => "a,b'",
            BasisSetting::APrimeB => "a',b",
            BasisSetting::APrimeBPrime => "a',b'",
        };
        write!(f, "({label})")
    }
}

/// Weights of the four two-qubit outcomes.
///
/// Index `i` is the outcome whose bits, first qubit first, spell `i` in
/// binary: `[P00, P01, P10, P11]`. Weights may be probabilities or raw
/// shot counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDistribution {
    weights: [f64; 4],
}

impl OutcomeDistribution {
    /// Wrap four weights. Returns `None` if any weight is negative or not
    /// finite.
    pub fn new(weights: [f64; 4]) -> Option<Self> {
        weights
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
            .then_some(Self { weights })
    }

    /// Build from a probability vector; it must have exactly four entries.
    pub fn from_probabilities(values: &[f64]) -> Option<Self> {
        let weights: [f64; 4] = values.try_into().ok()?;
        Self::new(weights)
    }

    /// The raw weights.
    pub fn weights(&self) -> &[f64; 4] {
        &self.weights
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Correlation `((P00 + P11) − (P01 + P10)) / total`, or `None` for an
    /// empty distribution.
    pub fn expectation(&self) -> Option<f64> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let [p00, p01, p10, p11] = self.weights;
        let same = p00 + p11;
        let different = p01 + p10;
        Some(((same - different) / total).clamp(-1.0, 1.0))
    }
}

/// Outcome of the CHSH analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChshResults {
    /// The CHSH statistic `S`.
    pub chsh_value: f64,
    /// Input distributions in basis order.
    pub distributions: [OutcomeDistribution; 4],
    /// Expectation values in basis order.
    pub expectations: [f64; 4],
}

impl ChshResults {
    /// Expectation value of one setting.
    pub fn expectation(&self, setting: BasisSetting) -> f64 {
        self.expectations[setting.index()]
    }

    /// E(a, b).
    pub fn e_ab(&self) -> f64 {
        self.expectation(BasisSetting::AB)
    }

    /// E(a, b').
    pub fn e_ab_prime(&self) -> f64 {
        self.expectation(BasisSetting::ABPrime)
    }

    /// E(a', b).
    pub fn e_a_prime_b(&self) -> f64 {
        self.expectation(BasisSetting::APrimeB)
    }

    /// E(a', b').
    pub fn e_a_prime_b_prime(&self) -> f64 {
        self.expectation(BasisSetting::APrimeBPrime)
    }

    /// Whether `S` exceeds the classical bound by more than `tolerance`.
    ///
    /// A tolerance of zero is the strict `S > 2` test.
    pub fn is_violated(&self, tolerance: f64) -> bool {
        self.chsh_value > CLASSICAL_BOUND + tolerance
    }
}

/// Compute expectation values and the CHSH statistic.
pub fn analyze(distributions: &[OutcomeDistribution; 4]) -> ChshResult<ChshResults> {
    let mut expectations = [0.0; 4];
    for (setting, dist) in BasisSetting::ALL.into_iter().zip(distributions) {
        expectations[setting.index()] = dist
            .expectation()
            .ok_or(ChshError::EmptyDistribution { setting })?;
    }

    let chsh_value: f64 = BasisSetting::ALL
        .iter()
        .zip(expectations)
        .map(|(setting, e)| setting.sign() * e)
        .sum();

    Ok(ChshResults {
        chsh_value,
        distributions: *distributions,
        expectations,
    })
}
