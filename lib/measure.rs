//! Single-qubit probabilities, wavefunction collapse, and sampling.
//!
//! Computing a probability and collapsing onto an outcome are separate
//! operations so that the caller may draw the outcome from its own source of
//! randomness. [`QubitRegister::measure`] combines them using the register's
//! own generator.
//!
//! Collapse does not renormalize. Several collapses can be batched before a
//! single call to [`QubitRegister::normalize`].

use std::{ collections::BTreeMap, fmt };
use rand::Rng;
use tracing::{ trace, warn };
use crate::{
    error::{ SimError, SimResult },
    kernel,
    register::QubitRegister,
};

/// A single-qubit measurement outcome in the Z basis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// ∣0⟩
    Zero,
    /// ∣1⟩
    One,
}

impl From<bool> for Outcome {
    fn from(b: bool) -> Self { if b { Self::One } else { Self::Zero } }
}

impl From<Outcome> for bool {
    fn from(outcome: Outcome) -> Self { outcome.is_1() }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Zero => write!(f, "0"),
            Self::One => write!(f, "1"),
        }
    }
}

impl Outcome {
    /// Return `true` if `self` is `Zero`.
    pub fn is_0(&self) -> bool { matches!(self, Self::Zero) }

    /// Return `true` if `self` is `One`.
    pub fn is_1(&self) -> bool { matches!(self, Self::One) }
}

impl QubitRegister {
    /// Return the probability of finding the `k`-th qubit in ∣1⟩.
    ///
    /// The result is clamped to [0, 1]. For an unnormalized state this is the
    /// unnormalized weight of the ∣1⟩ branch.
    pub fn probability(&self, k: usize) -> SimResult<f64> {
        self.weight_1(k).map(|p| p.clamp(0.0, 1.0))
    }

    // unclamped squared norm of the ∣1⟩ branch of qubit `k`
    fn weight_1(&self, k: usize) -> SimResult<f64> {
        self.check_qubit(k)?;
        let mask: usize = 1 << k;
        let p: f64
            = self.amps.iter().enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();
        Ok(p)
    }

    /// Return the probability of every computational basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Zero every amplitude inconsistent with finding the `k`-th qubit in
    /// `outcome`.
    ///
    /// The surviving amplitudes are *not* renormalized; their total weight is
    /// the pre-collapse probability of `outcome`.
    pub fn collapse(&mut self, k: usize, outcome: Outcome)
        -> SimResult<&mut Self>
    {
        self.check_qubit(k)?;
        let par = self.parallel();
        kernel::zero_branch(&mut self.amps, k, outcome.is_1(), par);
        trace!(qubit = k, %outcome, "collapsed qubit");
        Ok(self)
    }

    /// Rescale all amplitudes so that the state has unit norm.
    ///
    /// Fails with [`SimError::DegenerateState`] if the norm is numerically
    /// zero, leaving the state untouched.
    pub fn normalize(&mut self) -> SimResult<&mut Self> {
        let norm_sqr = self.norm_sqr();
        if !(norm_sqr > f64::MIN_POSITIVE) || !norm_sqr.is_finite() {
            warn!(norm_sqr, "refusing to normalize a degenerate state");
            return Err(SimError::DegenerateState { norm_sqr });
        }
        let par = self.parallel();
        kernel::scale(&mut self.amps, norm_sqr.sqrt().recip(), par);
        Ok(self)
    }

    /// Perform a projective measurement on the `k`-th qubit in the Z basis
    /// using the register's generator, returning the outcome.
    ///
    /// The state is collapsed and renormalized. The outcome is drawn relative
    /// to the current norm, so an unnormalized state (e.g. after
    /// [`Self::collapse`]) is measured as if it had been normalized first.
    ///
    /// Fails with [`SimError::DegenerateState`] if the state has no weight,
    /// leaving it untouched.
    pub fn measure(&mut self, k: usize) -> SimResult<Outcome> {
        let p1 = self.weight_1(k)?;
        let norm_sqr = self.norm_sqr();
        if !(norm_sqr > f64::MIN_POSITIVE) || !norm_sqr.is_finite() {
            warn!(norm_sqr, "refusing to measure a degenerate state");
            return Err(SimError::DegenerateState { norm_sqr });
        }
        let r: f64 = self.rng.gen();
        let outcome = Outcome::from(r * norm_sqr < p1);
        self.collapse(k, outcome)?.normalize()?;
        trace!(qubit = k, p1, %outcome, "measured qubit");
        Ok(outcome)
    }

    /// Like [`Self::measure`], but deterministically reset the qubit to ∣0⟩
    /// afterwards.
    ///
    /// The outcome of the original measurement is returned.
    pub fn measure_reset(&mut self, k: usize) -> SimResult<Outcome> {
        let outcome = self.measure(k)?;
        if outcome.is_1() { self.apply_x(k)?; }
        Ok(outcome)
    }

    /// Draw `shots` basis-state indices from the state's probability
    /// distribution without disturbing it, returning the number of times each
    /// index was drawn.
    ///
    /// Fails with [`SimError::DegenerateState`] if the state has no weight.
    pub fn sample(&mut self, shots: usize) -> SimResult<BTreeMap<usize, usize>> {
        let mut acc: f64 = 0.0;
        let cumulative: Vec<f64>
            = self.amps.iter()
            .map(|a| { acc += a.norm_sqr(); acc })
            .collect();
        let total = acc;
        if !(total > f64::MIN_POSITIVE) || !total.is_finite() {
            return Err(SimError::DegenerateState { norm_sqr: total });
        }
        let last = cumulative.len() - 1;
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for _ in 0..shots {
            let r: f64 = self.rng.gen::<f64>() * total;
            let k = cumulative.partition_point(|c| *c <= r).min(last);
            *counts.entry(k).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
