//! qbell Circuit Intermediate Representation
//!
//! This crate provides the data structures for describing the small quantum
//! circuits qbell submits to backends: qubit addressing, standard gates,
//! instructions, and the result types a backend is asked to report.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] for addressing the quantum register
//! - **Gates**: [`StandardGate`] for built-in gates (H, X, CX, rotations)
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Result types**: [`ResultType`] for analytic or sampled probabilities
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell Pair
//!
//! ```rust
//! use qbell_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_pair", 2);
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2, then ask for outcome probabilities
//! circuit
//!     .bell_singlet(QubitId(0), QubitId(1))
//!     .unwrap()
//!     .probability([QubitId(0), QubitId(1)])
//!     .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CZ` | 2 | Controlled-Z |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod result_type;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use qubit::QubitId;
pub use result_type::ResultType;
