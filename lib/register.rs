//! *N*-qubit registers stored as dense state vectors.
//!
//! A register owns the full array of 2<sup>*N*</sup> complex amplitudes, where
//! bit *k* of an amplitude's index is the value of the *k*-th qubit in that
//! basis state. All operations act in place.
//!
//! Each register also owns a seeded random number generator, fixed at
//! construction. It is only consumed by random initialization, measurement,
//! and sampling, always on the calling thread and in index order, so a fixed
//! seed reproduces the same sequence of states regardless of how many threads
//! rayon is given.
//!
//! # Example
//! ```
//! use statevec_sim::register::{ Init, QubitRegister };
//!
//! // prepare a Bell state on qubits 0, 1 of a 3-qubit register
//! let mut reg = QubitRegister::new(3, Init::Basis(0), Some(1234)).unwrap();
//! reg.apply_h(0).unwrap()
//!     .apply_cnot(0, 1).unwrap();
//! assert!((reg.amplitude(0b000).unwrap().norm_sqr() - 0.5).abs() < 1e-12);
//! assert!((reg.amplitude(0b011).unwrap().norm_sqr() - 0.5).abs() < 1e-12);
//! ```

use nalgebra as na;
use num_complex::Complex64 as C64;
use rand::{ rngs::StdRng, Rng, SeedableRng };
use tracing::{ debug, trace };
use crate::{
    config::SimConfig,
    error::{ SimError, SimResult },
    gate::{ self, Gate, Mat2, Mat4 },
    kernel,
};

/// Largest register that can be allocated.
pub const MAX_QUBITS: usize = 30;

/// Initialization mode for a [`QubitRegister`].
#[derive(Clone, Debug, PartialEq)]
pub enum Init {
    /// A single computational basis state, identified by its index.
    Basis(usize),
    /// Real and imaginary parts of every amplitude drawn uniformly from
    /// [-1, 1) using the register's generator, then normalized.
    Random,
    /// Amplitudes supplied by the caller, copied as-is without normalization.
    Amplitudes(Vec<C64>),
}

impl Init {
    fn label(&self) -> &'static str {
        match self {
            Self::Basis(_) => "basis",
            Self::Random => "random",
            Self::Amplitudes(_) => "amplitudes",
        }
    }
}

/// A register of `n` qubits in a pure state.
#[derive(Clone, Debug)]
pub struct QubitRegister {
    pub(crate) n: usize,
    pub(crate) amps: Vec<C64>,
    pub(crate) rng: StdRng,
    pub(crate) config: SimConfig,
}

impl QubitRegister {
    /// Create a new register of `n` qubits, optionally seeding its random
    /// number generator.
    ///
    /// Fails with [`SimError::InvalidConfiguration`] if `n` is zero or greater
    /// than [`MAX_QUBITS`], or if `init` does not fit the register.
    pub fn new(n: usize, init: Init, seed: Option<u64>) -> SimResult<Self> {
        let rng
            = seed.map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);
        Self::with_rng(n, init, rng)
    }

    /// Like [`Self::new`], but attaching an existing generator.
    pub fn with_rng(n: usize, init: Init, rng: StdRng) -> SimResult<Self> {
        Self::with_config(n, init, rng, SimConfig::default())
    }

    /// Like [`Self::with_rng`], but with non-default settings.
    pub fn with_config(n: usize, init: Init, rng: StdRng, config: SimConfig)
        -> SimResult<Self>
    {
        if n < 1 || n > MAX_QUBITS {
            return Err(SimError::InvalidConfiguration(
                format!("number of qubits must be in 1..={MAX_QUBITS}, got {n}")
            ));
        }
        let mut reg = Self {
            n,
            amps: vec![C64::from(0.0); 1 << n],
            rng,
            config,
        };
        reg.initialize(init)?;
        debug!(num_qubits = n, "created register");
        Ok(reg)
    }

    /// Overwrite the state of `self` in place.
    ///
    /// On error the state is left untouched.
    pub fn initialize(&mut self, init: Init) -> SimResult<&mut Self> {
        let mode = init.label();
        match init {
            Init::Basis(k) => {
                if k >= self.dim() {
                    return Err(SimError::InvalidConfiguration(
                        format!(
                            "basis state {} is out of range for {} qubits",
                            k, self.n,
                        )
                    ));
                }
                self.amps.fill(C64::from(0.0));
                self.amps[k] = C64::from(1.0);
            },
            Init::Random => {
                let rng = &mut self.rng;
                self.amps.iter_mut()
                    .for_each(|a| {
                        let re: f64 = rng.gen_range(-1.0..1.0);
                        let im: f64 = rng.gen_range(-1.0..1.0);
                        *a = C64::new(re, im);
                    });
                self.normalize()?;
            },
            Init::Amplitudes(amps) => {
                if amps.len() != self.dim() {
                    return Err(SimError::InvalidConfiguration(
                        format!(
                            "expected {} amplitudes, got {}",
                            self.dim(), amps.len(),
                        )
                    ));
                }
                self.amps.copy_from_slice(&amps);
            },
        }
        trace!(mode, "initialized register");
        Ok(self)
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.n }

    /// Return the number of amplitudes, 2<sup>`n`</sup>.
    pub fn dim(&self) -> usize { self.amps.len() }

    /// Return the settings attached to `self`.
    pub fn config(&self) -> &SimConfig { &self.config }

    /// Return all amplitudes in basis-index order.
    pub fn amplitudes(&self) -> &[C64] { &self.amps }

    /// Return a single amplitude, if `k` is a valid basis index.
    pub fn amplitude(&self, k: usize) -> Option<C64> {
        self.amps.get(k).copied()
    }

    /// Return the squared norm of the state.
    pub fn norm_sqr(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Return `true` if the squared norm is within the configured tolerance of
    /// 1.
    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() <= self.config.norm_tol
    }

    /// Copy the state into a column vector.
    pub fn as_vector(&self) -> na::DVector<C64> {
        na::DVector::from_column_slice(&self.amps)
    }

    /// Compute the squared overlap |⟨`self`|`other`⟩|².
    pub fn fidelity(&self, other: &Self) -> SimResult<f64> {
        if self.n != other.n {
            return Err(SimError::InvalidConfiguration(
                format!(
                    "cannot compare {}- and {}-qubit registers",
                    self.n, other.n,
                )
            ));
        }
        let overlap: C64
            = self.amps.iter().zip(&other.amps)
            .map(|(a, b)| a.conj() * b)
            .sum();
        Ok(overlap.norm_sqr())
    }

    pub(crate) fn check_qubit(&self, k: usize) -> SimResult<()> {
        if k < self.n {
            Ok(())
        } else {
            Err(SimError::out_of_range(k, self.n))
        }
    }

    pub(crate) fn check_pair(&self, a: usize, b: usize) -> SimResult<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        if a == b { Err(SimError::repeated(a)) } else { Ok(()) }
    }

    pub(crate) fn parallel(&self) -> bool { self.config.parallel_for(self.dim()) }

    /// Apply an arbitrary single-qubit matrix to the `k`-th qubit.
    ///
    /// `gate` is not checked for unitarity.
    pub fn apply_gate1(&mut self, k: usize, gate: &Mat2)
        -> SimResult<&mut Self>
    {
        self.check_qubit(k)?;
        let par = self.parallel();
        kernel::apply_gate1(&mut self.amps, k, gate, par);
        Ok(self)
    }

    /// Apply an X gate to the `k`-th qubit.
    pub fn apply_x(&mut self, k: usize) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::PAULI_X)
    }

    /// Apply a Y gate to the `k`-th qubit.
    pub fn apply_y(&mut self, k: usize) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::PAULI_Y)
    }

    /// Apply a Z gate to the `k`-th qubit.
    pub fn apply_z(&mut self, k: usize) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::PAULI_Z)
    }

    /// Apply a Hadamard gate to the `k`-th qubit.
    pub fn apply_h(&mut self, k: usize) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::HADAMARD)
    }

    /// Apply an S gate (= Z(π/2) up to phase) to the `k`-th qubit.
    pub fn apply_s(&mut self, k: usize) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::PHASE_S)
    }

    /// Apply a T gate (= Z(π/4) up to phase) to the `k`-th qubit.
    pub fn apply_t(&mut self, k: usize) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::PHASE_T)
    }

    /// Apply exp(-*iθX*/2) to the `k`-th qubit.
    pub fn apply_rx(&mut self, k: usize, angle: f64) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::xrot(angle))
    }

    /// Apply exp(-*iθY*/2) to the `k`-th qubit.
    pub fn apply_ry(&mut self, k: usize, angle: f64) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::yrot(angle))
    }

    /// Apply exp(-*iθZ*/2) to the `k`-th qubit.
    pub fn apply_rz(&mut self, k: usize, angle: f64) -> SimResult<&mut Self> {
        self.apply_gate1(k, &gate::zrot(angle))
    }

    /// Apply diag(1, e<sup>*iφ*</sup>) to the `k`-th qubit.
    pub fn apply_phase(&mut self, k: usize, angle: f64)
        -> SimResult<&mut Self>
    {
        self.apply_gate1(k, &gate::phase(angle))
    }

    /// Apply an arbitrary single-qubit matrix to qubit `t`, controlled on
    /// qubit `c`.
    ///
    /// Only amplitude pairs whose control bit is 1 are touched.
    pub fn apply_controlled_gate1(&mut self, c: usize, t: usize, gate: &Mat2)
        -> SimResult<&mut Self>
    {
        self.check_pair(c, t)?;
        let par = self.parallel();
        kernel::apply_controlled1(&mut self.amps, c, t, gate, par);
        Ok(self)
    }

    /// Apply a CNOT gate to the `t`-th qubit, with the `c`-th qubit as
    /// control.
    pub fn apply_cnot(&mut self, c: usize, t: usize) -> SimResult<&mut Self> {
        self.apply_controlled_gate1(c, t, &gate::PAULI_X)
    }

    /// Apply a CZ gate to the `c`-th and `t`-th qubits.
    pub fn apply_cz(&mut self, c: usize, t: usize) -> SimResult<&mut Self> {
        self.apply_controlled_gate1(c, t, &gate::PAULI_Z)
    }

    /// Apply a SWAP gate to the `a`-th and `b`-th qubits.
    pub fn apply_swap(&mut self, a: usize, b: usize) -> SimResult<&mut Self> {
        self.check_pair(a, b)?;
        let par = self.parallel();
        kernel::apply_swap(&mut self.amps, a, b, par);
        Ok(self)
    }

    /// Apply an arbitrary two-qubit matrix, with qubit `a` as the low bit of
    /// the matrix index and `b` as the high bit.
    pub fn apply_gate2(&mut self, a: usize, b: usize, gate: &Mat4)
        -> SimResult<&mut Self>
    {
        self.check_pair(a, b)?;
        let par = self.parallel();
        kernel::apply_gate2(&mut self.amps, a, b, gate, par);
        Ok(self)
    }

    /// Perform the action of a gate.
    pub fn apply_gate(&mut self, gate: &Gate) -> SimResult<&mut Self> {
        match gate {
            Gate::H(k) => self.apply_h(*k),
            Gate::X(k) => self.apply_x(*k),
            Gate::Y(k) => self.apply_y(*k),
            Gate::Z(k) => self.apply_z(*k),
            Gate::S(k) => self.apply_s(*k),
            Gate::T(k) => self.apply_t(*k),
            Gate::XRot(k, ang) => self.apply_rx(*k, *ang),
            Gate::YRot(k, ang) => self.apply_ry(*k, *ang),
            Gate::ZRot(k, ang) => self.apply_rz(*k, *ang),
            Gate::U(k, m) => self.apply_gate1(*k, m),
            Gate::CX(c, t) => self.apply_cnot(*c, *t),
            Gate::CZ(c, t) => self.apply_cz(*c, *t),
            Gate::CU(c, t, m) => self.apply_controlled_gate1(*c, *t, m),
            Gate::Swap(a, b) => self.apply_swap(*a, *b),
            Gate::U2(a, b, m) => self.apply_gate2(*a, *b, m),
        }
    }

    /// Perform a series of gates, stopping at the first invalid one.
    pub fn apply_circuit<'a, I>(&mut self, gates: I) -> SimResult<&mut Self>
    where I: IntoIterator<Item = &'a Gate>
    {
        for g in gates.into_iter() { self.apply_gate(g)?; }
        Ok(self)
    }
}
