//! qbell Local Statevector Simulator
//!
//! This crate provides a local quantum simulator for running qbell circuits
//! without hardware. It keeps the full statevector, so results are exact
//! and the register is limited to ~20 qubits.
//!
//! # Features
//!
//! - **Exact Mode**: `shots = 0` fills probability result types analytically
//! - **Sampled Mode**: `shots > 0` draws outcomes into [`qbell_hal::Counts`]
//! - **Reproducible Runs**: [`SimulatorBackend::with_seed`] fixes the sampler
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 30 | ~16 GB | Upper limit ([`MAX_SIMULABLE_QUBITS`]) |
//!
//! # Example
//!
//! ```ignore
//! use qbell_adapter_sim::SimulatorBackend;
//! use qbell_hal::Backend;
//! use qbell_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::with_seed(7);
//!
//!     let circuit = Circuit::bell()?;
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     // Expect ~50% |00⟩ and ~50% |11⟩
//!     println!("Results: {:?}", result.counts.sorted());
//!
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{MAX_SIMULABLE_QUBITS, SimulatorBackend};
