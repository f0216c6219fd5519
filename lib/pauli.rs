//! Expectation values of weighted Pauli strings.
//!
//! A Pauli string names a single-qubit Pauli operator for some subset of the
//! register's qubits; every qubit not named carries the identity. Expectation
//! values are computed directly from the amplitudes without forming the
//! operator or copying the state: for a string with *X*-or-*Y* support mask
//! *f* and *Y*-or-*Z* support mask *s*, the operator acts on basis states as
//!
//! *P*∣*i*⟩ = **i**<sup>*n*<sub>*Y*</sub></sup> (-1)<sup>|*i* ∧ *s*|</sup>
//! ∣*i* ⊕ *f*⟩
//!
//! so ⟨ψ|*P*|ψ⟩ is a single pass over the amplitudes, accumulated in complex
//! arithmetic.

use std::fmt;
use itertools::Itertools;
use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    error::{ SimError, SimResult },
    gate::{ PAULI_X, PAULI_Y, PAULI_Z },
    register::QubitRegister,
};

/// A single-qubit Pauli operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity
    I,
    /// σ<sub>*x*</sub>
    X,
    /// σ<sub>*y*</sub>
    Y,
    /// σ<sub>*z*</sub>
    Z,
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::I => write!(f, "{}", if f.alternate() { "." } else { "I" }),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Pauli {
    /// Convert from the integer encoding I = 0, X = 1, Y = 2, Z = 3.
    pub fn from_int(u: u8) -> Option<Self> {
        match u {
            0 => Some(Self::I),
            1 => Some(Self::X),
            2 => Some(Self::Y),
            3 => Some(Self::Z),
            _ => None,
        }
    }

    /// Convert to the integer encoding I = 0, X = 1, Y = 2, Z = 3.
    pub fn to_int(self) -> u8 {
        match self {
            Self::I => 0,
            Self::X => 1,
            Self::Y => 2,
            Self::Z => 3,
        }
    }

    /// Return the 2×2 matrix of `self`.
    pub fn matrix(self) -> na::DMatrix<C64> {
        let m = match self {
            Self::I => return na::DMatrix::identity(2, 2),
            Self::X => &*PAULI_X,
            Self::Y => &*PAULI_Y,
            Self::Z => &*PAULI_Z,
        };
        na::DMatrix::from_fn(2, 2, |i, j| m[(i, j)])
    }
}

/// A tensor product of single-qubit Paulis on distinct qubits, with a real
/// coefficient.
///
/// Identities are dropped on construction, so a string may carry no operators
/// at all, in which case it is a multiple of the identity.
#[derive(Clone, Debug, PartialEq)]
pub struct PauliString {
    ops: Vec<(usize, Pauli)>, // sorted by qubit, no identities
    coeff: f64,
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.coeff)?;
        if self.ops.is_empty() { return write!(f, " I"); }
        for (k, p) in self.ops.iter() { write!(f, " {}{}", p, k)?; }
        Ok(())
    }
}

impl PauliString {
    /// Create a new Pauli string from parallel lists of qubit indices and
    /// operators.
    ///
    /// Fails with [`SimError::InvalidObservable`] if the lists are empty or of
    /// unequal length, or if any qubit index appears more than once.
    pub fn new(qubits: &[usize], paulis: &[Pauli], coeff: f64)
        -> SimResult<Self>
    {
        if qubits.is_empty() {
            return Err(SimError::InvalidObservable(
                "a Pauli string must act on at least one qubit".into()));
        }
        if qubits.len() != paulis.len() {
            return Err(SimError::InvalidObservable(
                format!(
                    "{} qubit indices given for {} Pauli operators",
                    qubits.len(), paulis.len(),
                )
            ));
        }
        if let Some(k) = qubits.iter().duplicates().next() {
            return Err(SimError::InvalidObservable(
                format!("qubit {} appears more than once", k)));
        }
        let ops: Vec<(usize, Pauli)>
            = qubits.iter().copied()
            .zip(paulis.iter().copied())
            .filter(|(_, p)| *p != Pauli::I)
            .sorted_by_key(|(k, _)| *k)
            .collect();
        Ok(Self { ops, coeff })
    }

    /// Like [`Self::new`], but with operators given in the integer encoding
    /// X = 1, Y = 2, Z = 3.
    ///
    /// Any other code is an [`SimError::InvalidObservable`].
    pub fn from_codes(qubits: &[usize], codes: &[u8], coeff: f64)
        -> SimResult<Self>
    {
        let paulis: Vec<Pauli>
            = codes.iter()
            .map(|c| {
                Pauli::from_int(*c)
                    .filter(|p| *p != Pauli::I)
                    .ok_or_else(|| SimError::InvalidObservable(
                        format!("invalid Pauli code {}; expected 1, 2, or 3", c)
                    ))
            })
            .collect::<SimResult<_>>()?;
        Self::new(qubits, &paulis, coeff)
    }

    /// A multiple of the identity.
    pub fn identity(coeff: f64) -> Self { Self { ops: Vec::new(), coeff } }

    /// Return the coefficient.
    pub fn coeff(&self) -> f64 { self.coeff }

    /// Replace the coefficient.
    pub fn with_coeff(mut self, coeff: f64) -> Self {
        self.coeff = coeff;
        self
    }

    /// Return the non-identity operators, sorted by qubit index.
    pub fn ops(&self) -> &[(usize, Pauli)] { &self.ops }

    /// Return `true` if every operator is *Z* (or there are none).
    pub fn is_diagonal(&self) -> bool {
        self.ops.iter().all(|(_, p)| *p == Pauli::Z)
    }

    // (bit-flip mask, sign mask, number of Ys)
    fn masks(&self) -> (usize, usize, usize) {
        self.ops.iter()
            .fold((0, 0, 0), |(flip, sign, ny), (k, p)| {
                let m: usize = 1 << k;
                match p {
                    Pauli::I => (flip, sign, ny),
                    Pauli::X => (flip | m, sign, ny),
                    Pauli::Y => (flip | m, sign | m, ny + 1),
                    Pauli::Z => (flip, sign | m, ny),
                }
            })
    }

    fn check(&self, n: usize) -> SimResult<()> {
        match self.ops.last() {
            Some((k, _)) if *k >= n => Err(SimError::out_of_range(*k, n)),
            _ => Ok(()),
        }
    }

    /// Construct the dense 2<sup>`n`</sup> × 2<sup>`n`</sup> matrix of `self`,
    /// including the coefficient.
    ///
    /// Qubit *k* corresponds to bit *k* of the row/column index, so the
    /// highest qubit is leftmost in the Kronecker product.
    pub fn to_matrix(&self, n: usize) -> SimResult<na::DMatrix<C64>> {
        self.check(n)?;
        let mut acc: na::DMatrix<C64>
            = na::DMatrix::from_element(1, 1, C64::from(self.coeff));
        for k in (0..n).rev() {
            let p
                = self.ops.iter()
                .find(|(j, _)| *j == k)
                .map(|(_, p)| *p)
                .unwrap_or(Pauli::I);
            acc = acc.kronecker(&p.matrix());
        }
        Ok(acc)
    }
}

/// A weighted sum of Pauli strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PauliSum {
    terms: Vec<PauliString>,
}

impl From<Vec<PauliString>> for PauliSum {
    fn from(terms: Vec<PauliString>) -> Self { Self { terms } }
}

impl FromIterator<PauliString> for PauliSum {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = PauliString>
    {
        Self { terms: iter.into_iter().collect() }
    }
}

impl fmt::Display for PauliSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.terms.len();
        for (i, term) in self.terms.iter().enumerate() {
            write!(f, "{}", term)?;
            if i < n - 1 { write!(f, " ")?; }
        }
        Ok(())
    }
}

impl PauliSum {
    pub fn new() -> Self { Self::default() }

    /// Append a term.
    pub fn push(&mut self, term: PauliString) -> &mut Self {
        self.terms.push(term);
        self
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn terms(&self) -> &[PauliString] { &self.terms }
}

impl QubitRegister {
    /// Compute `coeff` · ⟨ψ|*P*|ψ⟩ in full complex arithmetic.
    ///
    /// For a normalized state the imaginary part vanishes up to rounding.
    pub fn expectation_complex(&self, obs: &PauliString) -> SimResult<C64> {
        obs.check(self.n)?;
        let (flip, sign, ny) = obs.masks();
        let acc: C64
            = self.amps.iter().enumerate()
            .map(|(i, a)| {
                let b = self.amps[i ^ flip];
                if (i & sign).count_ones() % 2 == 0 {
                    b.conj() * a
                } else {
                    -(b.conj() * a)
                }
            })
            .sum();
        let phase = match ny % 4 {
            0 => C64::from(1.0),
            1 => C64::i(),
            2 => C64::from(-1.0),
            3 => -C64::i(),
            _ => unreachable!(),
        };
        Ok(acc * phase * obs.coeff)
    }

    /// Compute `coeff` · ⟨ψ|*P*|ψ⟩.
    ///
    /// Fails with [`SimError::InvalidQubitIndex`] if the string acts on a
    /// qubit outside the register. The state is not modified.
    pub fn expectation(&self, obs: &PauliString) -> SimResult<f64> {
        self.expectation_complex(obs).map(|z| z.re)
    }

    /// Compute the expectation value of a sum of Pauli strings.
    pub fn expectation_sum(&self, obs: &PauliSum) -> SimResult<f64> {
        obs.terms.iter()
            .map(|term| self.expectation(term))
            .sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::{ error::IndexFault, register::Init };

    fn dense_expectation(reg: &QubitRegister, obs: &PauliString) -> C64 {
        let psi = reg.as_vector();
        let m = obs.to_matrix(reg.num_qubits()).unwrap();
        (psi.adjoint() * m * &psi)[(0, 0)]
    }

    #[test]
    fn validation() {
        assert!(matches!(
            PauliString::new(&[], &[], 1.0),
            Err(SimError::InvalidObservable(_)),
        ));
        assert!(matches!(
            PauliString::new(&[0, 1], &[Pauli::X], 1.0),
            Err(SimError::InvalidObservable(_)),
        ));
        assert!(matches!(
            PauliString::new(&[2, 0, 2], &[Pauli::X, Pauli::Y, Pauli::Z], 1.0),
            Err(SimError::InvalidObservable(_)),
        ));
        assert!(matches!(
            PauliString::from_codes(&[0], &[4], 1.0),
            Err(SimError::InvalidObservable(_)),
        ));
        assert!(matches!(
            PauliString::from_codes(&[0], &[0], 1.0),
            Err(SimError::InvalidObservable(_)),
        ));

        let reg = QubitRegister::new(2, Init::Basis(0), Some(0)).unwrap();
        let obs = PauliString::from_codes(&[5], &[3], 1.0).unwrap();
        assert_eq!(
            reg.expectation(&obs).err(),
            Some(SimError::InvalidQubitIndex(
                IndexFault::OutOfRange { index: 5, num_qubits: 2 })),
        );
    }

    #[test]
    fn single_qubit_eigenstates() {
        use std::f64::consts::FRAC_PI_2;
        let x = PauliString::from_codes(&[0], &[1], 1.0).unwrap();
        let y = PauliString::from_codes(&[0], &[2], 1.0).unwrap();
        let z = PauliString::from_codes(&[0], &[3], 1.0).unwrap();

        let mut reg = QubitRegister::new(1, Init::Basis(0), Some(0)).unwrap();
        assert_abs_diff_eq!(reg.expectation(&z).unwrap(), 1.0, epsilon = 1e-12);
        reg.apply_h(0).unwrap();
        assert_abs_diff_eq!(reg.expectation(&x).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reg.expectation(&z).unwrap(), 0.0, epsilon = 1e-12);
        // |+i> = S|+>
        reg.apply_s(0).unwrap();
        assert_abs_diff_eq!(reg.expectation(&y).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reg.expectation(&x).unwrap(), 0.0, epsilon = 1e-12);
        // a π/2 rotation about X takes +y to +z
        reg.apply_rx(0, FRAC_PI_2).unwrap();
        assert_abs_diff_eq!(reg.expectation(&y).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reg.expectation(&z).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn matches_dense_matrix() {
        let reg = QubitRegister::new(4, Init::Random, Some(31)).unwrap();
        let strings = [
            PauliString::from_codes(&[0], &[2], 0.5).unwrap(),
            PauliString::from_codes(&[3, 1], &[1, 2], -1.5).unwrap(),
            PauliString::from_codes(&[0, 1, 2, 3], &[2, 2, 3, 1], 1.0).unwrap(),
            PauliString::new(&[2, 0], &[Pauli::Y, Pauli::I], 2.0).unwrap(),
            PauliString::identity(0.25),
        ];
        for obs in strings.iter() {
            let fast = reg.expectation_complex(obs).unwrap();
            let dense = dense_expectation(&reg, obs);
            assert_abs_diff_eq!(fast.re, dense.re, epsilon = 1e-10);
            assert_abs_diff_eq!(fast.im, dense.im, epsilon = 1e-10);
            assert_abs_diff_eq!(fast.im, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn expectation_does_not_mutate() {
        let reg = QubitRegister::new(3, Init::Random, Some(6)).unwrap();
        let before = reg.amplitudes().to_vec();
        let obs = PauliString::from_codes(&[0, 1, 2], &[1, 2, 3], 1.0).unwrap();
        reg.expectation(&obs).unwrap();
        assert_eq!(reg.amplitudes(), before.as_slice());
    }

    #[test]
    fn sum_of_terms() {
        let mut reg = QubitRegister::new(2, Init::Basis(0), Some(0)).unwrap();
        reg.apply_h(0).unwrap().apply_cnot(0, 1).unwrap();
        let ham: PauliSum
            = [
                PauliString::from_codes(&[0, 1], &[1, 1], 1.0).unwrap(),
                PauliString::from_codes(&[0, 1], &[2, 2], 1.0).unwrap(),
                PauliString::from_codes(&[0, 1], &[3, 3], 1.0).unwrap(),
            ]
            .into_iter()
            .collect();
        // Bell state |Φ+>: <XX> = 1, <YY> = -1, <ZZ> = 1
        assert_abs_diff_eq!(reg.expectation_sum(&ham).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(ham.len(), 3);
        assert_eq!(format!("{}", ham.terms()[0]), "+1 X0 X1");
    }

    #[test]
    fn display() {
        let obs = PauliString::from_codes(&[3, 0], &[3, 1], -0.5).unwrap();
        assert_eq!(format!("{}", obs), "-0.5 X0 Z3");
        assert_eq!(format!("{}", PauliString::identity(2.0)), "+2 I");
        assert!(obs.ops().iter().all(|(_, p)| Pauli::from_int(p.to_int()) == Some(*p)));
        assert!(!obs.is_diagonal());
    }
}
