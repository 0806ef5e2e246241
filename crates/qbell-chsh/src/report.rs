//! Human-readable CHSH report.

use std::fmt;

use crate::analysis::{BasisSetting, CLASSICAL_BOUND, ChshResults, TSIRELSON_BOUND};

/// Plain-text report of a CHSH analysis.
///
/// ```text
/// E(a,b) = 0.7071, E(a,b') = -0.7071, E(a',b) = 0.7071, E(a',b') = 0.7071
///
/// CHSH inequality: 2.8284 ≤ 2
/// CHSH inequality is violated!
/// ...
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ChshReport<'a> {
    results: &'a ChshResults,
    tolerance: f64,
}

impl<'a> ChshReport<'a> {
    /// Report using the strict `S > 2` verdict.
    pub fn new(results: &'a ChshResults) -> Self {
        Self {
            results,
            tolerance: 0.0,
        }
    }

    /// Require `S > 2 + tolerance` for a violation.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl fmt::Display for ChshReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = BasisSetting::ALL
            .iter()
            .map(|&s| format!("E{s} = {:.4}", self.results.expectation(s)))
            .collect();
        writeln!(f, "{}", values.join(", "))?;
        writeln!(f)?;
        writeln!(
            f,
            "CHSH inequality: {:.4} \u{2264} {CLASSICAL_BOUND}",
            self.results.chsh_value
        )?;

        if self.results.is_violated(self.tolerance) {
            writeln!(f, "CHSH inequality is violated!")?;
            write!(
                f,
                "The value may differ from the quantum prediction of {TSIRELSON_BOUND:.4} \
                 because of finite shots or noise on the device."
            )
        } else {
            write!(f, "CHSH inequality is not violated.")
        }
    }
}
