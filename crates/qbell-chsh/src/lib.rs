//! qbell CHSH Inequality Test
//!
//! This crate runs the CHSH test for Bell nonlocality on any
//! [`qbell_hal::Backend`]: it builds four two-qubit circuits, submits them,
//! and turns the measured distributions into correlation values and a
//! violation verdict.
//!
//! # Workflow
//!
//! 1. [`create_chsh_inequality_circuits`] prepares a Bell pair and rotates
//!    each qubit into one of the settings (a,b), (a,b'), (a',b), (a',b').
//! 2. [`run_chsh_inequality`] validates and submits the circuits, returning
//!    one [`QuantumTask`] per circuit.
//! 3. [`get_chsh_results`] awaits the tasks and computes
//!    `S = E(a,b) − E(a,b') + E(a',b) + E(a',b')`.
//!
//! With the default [`ChshAngles`] quantum mechanics predicts `S = 2√2`,
//! above the classical bound of 2.
//!
//! # Example
//!
//! ```ignore
//! use qbell_adapter_sim::SimulatorBackend;
//! use qbell_chsh::{ChshAngles, create_chsh_inequality_circuits, get_chsh_results, run_chsh_inequality};
//! use qbell_ir::QubitId;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new();
//!     let circuits = create_chsh_inequality_circuits(QubitId(0), QubitId(1), &ChshAngles::default())?;
//!
//!     // shots = 0 asks the simulator for exact probabilities
//!     let tasks = run_chsh_inequality(&circuits, &backend, 0).await?;
//!     let results = get_chsh_results(&tasks, true).await?;
//!
//!     assert!(results.is_violated(0.0));
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod circuits;
pub mod config;
pub mod error;
pub mod experiment;
pub mod report;
pub mod runner;

pub use analysis::{
    BasisSetting, CLASSICAL_BOUND, ChshResults, OutcomeDistribution, TSIRELSON_BOUND, analyze,
};
pub use circuits::{bell_singlet_rotated_basis, create_chsh_inequality_circuits};
pub use config::{ChshAngles, ChshConfig};
pub use error::{ChshError, ChshResult};
pub use experiment::ChshExperiment;
pub use report::ChshReport;
pub use runner::{QuantumTask, get_chsh_results, run_chsh_inequality};

/// Default number of shots per circuit.
pub const DEFAULT_SHOTS: u32 = 1000;
