//! Experiment configuration.
//!
//! A [`ChshConfig`] can be built in code or loaded from YAML. Every field is
//! optional in the file; missing fields take the defaults below.
//!
//! ```yaml
//! qubit0: 0
//! qubit1: 1
//! shots: 1000
//! verbose: true
//! tolerance: 0.0
//! angles:
//!   a: 0.0
//!   a_prime: 0.7853981633974483
//!   b: 0.39269908169872414
//!   b_prime: 1.1780972450961724
//! ```

use std::f64::consts::{FRAC_PI_4, FRAC_PI_8};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::BasisSetting;
use crate::error::{ChshError, ChshResult};

/// Measurement angles for the two parties.
///
/// Angles are in radians. Each circuit rotates its qubit by `Ry(2·angle)`,
/// so the correlation of a setting is `cos(2(θa − θb))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChshAngles {
    /// First setting of party A.
    pub a: f64,
    /// Second setting of party A.
    pub a_prime: f64,
    /// First setting of party B.
    pub b: f64,
    /// Second setting of party B.
    pub b_prime: f64,
}

impl Default for ChshAngles {
    fn default() -> Self {
        Self {
            a: 0.0,
            a_prime: FRAC_PI_4,
            b: FRAC_PI_8,
            b_prime: 3.0 * FRAC_PI_8,
        }
    }
}

impl ChshAngles {
    /// The `(θa, θb)` pair used by `setting`.
    pub fn for_setting(&self, setting: BasisSetting) -> (f64, f64) {
        match setting {
            BasisSetting::AB => (self.a, self.b),
            BasisSetting::ABPrime => (self.a, self.b_prime),
            BasisSetting::APrimeB => (self.a_prime, self.b),
            BasisSetting::APrimeBPrime => (self.a_prime, self.b_prime),
        }
    }

    /// Ideal expectation values for the four settings, in basis order.
    pub fn predicted_expectations(&self) -> [f64; 4] {
        BasisSetting::ALL.map(|setting| {
            let (theta_a, theta_b) = self.for_setting(setting);
            (2.0 * (theta_a - theta_b)).cos()
        })
    }

    /// Ideal CHSH statistic for these angles.
    pub fn predicted_value(&self) -> f64 {
        BasisSetting::ALL
            .iter()
            .zip(self.predicted_expectations())
            .map(|(setting, e)| setting.sign() * e)
            .sum()
    }

    fn validate(&self) -> ChshResult<()> {
        for (name, value) in [
            ("a", self.a),
            ("a_prime", self.a_prime),
            ("b", self.b),
            ("b_prime", self.b_prime),
        ] {
            if !value.is_finite() {
                return Err(ChshError::Config(format!(
                    "angle '{name}' must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for one CHSH run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChshConfig {
    /// Index of party A's qubit.
    pub qubit0: u32,
    /// Index of party B's qubit.
    pub qubit1: u32,
    /// Measurement angles.
    pub angles: ChshAngles,
    /// Shots per circuit. `0` asks the backend for exact probabilities.
    pub shots: u32,
    /// Print the report after aggregation.
    pub verbose: bool,
    /// Margin above the classical bound required to call a violation.
    pub tolerance: f64,
}

impl Default for ChshConfig {
    fn default() -> Self {
        Self {
            qubit0: 0,
            qubit1: 1,
            angles: ChshAngles::default(),
            shots: crate::DEFAULT_SHOTS,
            verbose: true,
            tolerance: 0.0,
        }
    }
}

impl ChshConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> ChshResult<Self> {
        let config: ChshConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ChshResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ChshResult<()> {
        if self.qubit0 == self.qubit1 {
            return Err(ChshError::Config(format!(
                "qubit0 and qubit1 must differ, both are {}",
                self.qubit0
            )));
        }
        if self.qubit0.max(self.qubit1) == u32::MAX {
            return Err(ChshError::Config(format!(
                "qubit index {} leaves no room for a register",
                u32::MAX
            )));
        }
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            return Err(ChshError::Config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        self.angles.validate()
    }
}
