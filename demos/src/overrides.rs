//! Command-line overrides for a CHSH configuration.

use qbell_chsh::ChshConfig;

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub shots: Option<u32>,
    pub qubit0: Option<u32>,
    pub qubit1: Option<u32>,
    pub a: Option<f64>,
    pub a_prime: Option<f64>,
    pub b: Option<f64>,
    pub b_prime: Option<f64>,
    pub tolerance: Option<f64>,
    /// Suppress the plain-text report.
    pub quiet: bool,
}

impl ConfigOverrides {
    /// Apply the overrides to `config`.
    pub fn apply(&self, mut config: ChshConfig) -> ChshConfig {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut config.shots, self.shots);
        set(&mut config.qubit0, self.qubit0);
        set(&mut config.qubit1, self.qubit1);
        set(&mut config.angles.a, self.a);
        set(&mut config.angles.a_prime, self.a_prime);
        set(&mut config.angles.b, self.b);
        set(&mut config.angles.b_prime, self.b_prime);
        set(&mut config.tolerance, self.tolerance);
        if self.quiet {
            config.verbose = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overrides_keep_config() {
        let config = ChshConfig {
            shots: 42,
            ..ChshConfig::default()
        };
        assert_eq!(ConfigOverrides::default().apply(config.clone()), config);
    }

    #[test]
    fn test_overrides_replace_fields() {
        let overrides = ConfigOverrides {
            shots: Some(0),
            qubit1: Some(5),
            b_prime: Some(1.0),
            tolerance: Some(0.1),
            quiet: true,
            ..ConfigOverrides::default()
        };
        let config = overrides.apply(ChshConfig::default());

        assert_eq!(config.shots, 0);
        assert_eq!(config.qubit0, 0);
        assert_eq!(config.qubit1, 5);
        assert_eq!(config.angles.b_prime, 1.0);
        assert_eq!(config.angles.a, 0.0);
        assert_eq!(config.tolerance, 0.1);
        assert!(!config.verbose);
    }
}
