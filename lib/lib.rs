//! Dense state-vector simulation of small registers of qubits.
//!
//! States are stored as the full array of 2<sup>*N*</sup> complex amplitudes,
//! where bit *k* of a basis-state index gives the value of the *k*-th qubit.
//! Everything runs in a single process; gate kernels are parallelized over
//! disjoint amplitude pairs with [`rayon`] once a register is large enough
//! (see [`config::SimConfig`]).
//!
//! On top of the register sit a Pauli-string expectation value engine and the
//! primitives needed for QAOA on Max-Cut: a diagonal cost function, the phase
//! layer *exp*(-*iγC*), a transverse-field mixer, and a histogram of cut
//! values.
//!
//! # Example
//! ```
//! use statevec_sim::{ register::{ Init, QubitRegister }, pauli::PauliString };
//!
//! // |0000⟩, then flip qubit 0 and put the rest in superposition
//! let mut reg = QubitRegister::new(4, Init::Basis(0), Some(10)).unwrap();
//! reg.apply_x(0).unwrap();
//! (1..4).for_each(|k| { reg.apply_h(k).unwrap(); });
//! reg.apply_cnot(2, 1).unwrap();
//! assert!((reg.probability(1).unwrap() - 0.5).abs() < 1e-9);
//!
//! // ⟨Z_0⟩ = -1 since qubit 0 is ∣1⟩
//! let z0 = PauliString::from_codes(&[0], &[3], 1.0).unwrap();
//! assert!((reg.expectation(&z0).unwrap() + 1.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod config;
pub mod gate;
pub(crate) mod kernel;
pub mod register;
pub mod measure;
pub mod pauli;
pub mod cost;
pub mod circuit;

pub use error::{ IndexFault, SimError, SimResult };
