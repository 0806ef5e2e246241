//! qbell Hardware Abstraction Layer
//!
//! This crate provides the interface between qbell algorithms and the
//! backends that execute their circuits.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for job submission and management
//! - [`Capabilities`] to describe backend features and constraints
//! - Unified result handling via [`ExecutionResult`], [`Counts`], and
//!   [`ResultTypeValue`]
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use qbell_hal::Backend;
//! use qbell_adapter_sim::SimulatorBackend;
//! use qbell_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::bell()?;
//!     let backend = SimulatorBackend::new();
//!
//!     // shots = 0 asks for exact probabilities
//!     let job_id = backend.submit(&circuit, 0).await?;
//!     let result = backend.wait(&job_id).await?;
//!     println!("P = {:?}", result.probabilities());
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult, ResultTypeValue};
