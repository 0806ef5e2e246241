//! End-to-end CHSH run.

use tracing::{info, instrument};

use qbell_hal::Backend;
use qbell_ir::QubitId;

use crate::analysis::ChshResults;
use crate::circuits::create_chsh_inequality_circuits;
use crate::config::ChshConfig;
use crate::error::ChshResult;
use crate::report::ChshReport;
use crate::runner::{get_chsh_results, run_chsh_inequality};

/// Builds, submits and analyses the four CHSH circuits.
#[derive(Debug, Clone, Default)]
pub struct ChshExperiment {
    config: ChshConfig,
}

impl ChshExperiment {
    /// Create an experiment from a configuration.
    pub fn new(config: ChshConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ChshConfig {
        &self.config
    }

    /// Run on `backend` and return the analysed results.
    ///
    /// The report is printed when the configuration is verbose, using the
    /// configured tolerance for the verdict.
    #[instrument(skip_all, fields(backend = backend.name(), shots = self.config.shots))]
    pub async fn run(&self, backend: &dyn Backend) -> ChshResult<ChshResults> {
        self.config.validate()?;

        let circuits = create_chsh_inequality_circuits(
            QubitId(self.config.qubit0),
            QubitId(self.config.qubit1),
            &self.config.angles,
        )?;
        let tasks = run_chsh_inequality(&circuits, backend, self.config.shots).await?;
        let results = get_chsh_results(&tasks, false).await?;

        info!(
            chsh_value = results.chsh_value,
            predicted = self.config.angles.predicted_value(),
            violated = results.is_violated(self.config.tolerance),
            "CHSH experiment finished"
        );

        if self.config.verbose {
            println!(
                "{}",
                ChshReport::new(&results).with_tolerance(self.config.tolerance)
            );
        }

        Ok(results)
    }
}
