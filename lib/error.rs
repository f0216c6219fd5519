//! Errors returned by register, observable, and cost-function operations.
//!
//! All failures are local and synchronous; nothing here is retried.

use thiserror::Error;

/// Reason a qubit index was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum IndexFault {
    /// The index does not address a qubit in the register.
    #[error("qubit {index} is out of range for a {num_qubits}-qubit register")]
    OutOfRange { index: usize, num_qubits: usize },
    /// The same qubit was given where distinct qubits are required.
    #[error("qubit {0} was given more than once")]
    Repeated(usize),
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimError {
    /// Bad qubit count, initialization mode, or input dimensions.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid qubit index: {0}")]
    InvalidQubitIndex(#[from] IndexFault),

    /// Malformed Pauli string.
    #[error("invalid observable: {0}")]
    InvalidObservable(String),

    /// Normalization was attempted on a state with no probability mass.
    #[error("cannot normalize a state with squared norm {norm_sqr:e}")]
    DegenerateState { norm_sqr: f64 },

    /// A dynamically sized gate matrix had the wrong shape.
    #[error("expected a {expected}x{expected} gate matrix, got {rows}x{cols}")]
    InvalidGateShape { expected: usize, rows: usize, cols: usize },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn out_of_range(index: usize, num_qubits: usize) -> Self {
        IndexFault::OutOfRange { index, num_qubits }.into()
    }

    pub(crate) fn repeated(index: usize) -> Self {
        IndexFault::Repeated(index).into()
    }
}
