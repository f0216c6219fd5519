//! One- and two-qubit gates as small, fixed-size complex matrices.
//!
//! Matrices are written in the computational basis. For two-qubit matrices
//! the basis is ordered ∣q1 q0⟩, i.e. the first qubit operand is the low bit of
//! the 4×4 row/column index.
//!
//! Gate matrices are never checked for unitarity. A non-unitary matrix is
//! applied as given and will break the norm of the state.

use std::f64::consts::FRAC_1_SQRT_2;
use nalgebra as na;
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;
use rand::Rng;
use crate::error::{ SimError, SimResult };

/// A single-qubit gate matrix.
pub type Mat2 = na::Matrix2<C64>;

/// A two-qubit gate matrix.
pub type Mat4 = na::Matrix4<C64>;

const Z0: C64 = C64 { re: 0.0, im: 0.0 };
const Z1: C64 = C64 { re: 1.0, im: 0.0 };
const I1: C64 = C64 { re: 0.0, im: 1.0 };
const ORT2: C64 = C64 { re: FRAC_1_SQRT_2, im: 0.0 };

/// Hadamard.
pub static HADAMARD: Lazy<Mat2> =
    Lazy::new(|| Mat2::new(ORT2, ORT2, ORT2, -ORT2));

/// Pauli *X*.
pub static PAULI_X: Lazy<Mat2> = Lazy::new(|| Mat2::new(Z0, Z1, Z1, Z0));

/// Pauli *Y*.
pub static PAULI_Y: Lazy<Mat2> = Lazy::new(|| Mat2::new(Z0, -I1, I1, Z0));

/// Pauli *Z*.
pub static PAULI_Z: Lazy<Mat2> = Lazy::new(|| Mat2::new(Z1, Z0, Z0, -Z1));

/// π/2 phase.
pub static PHASE_S: Lazy<Mat2> = Lazy::new(|| Mat2::new(Z1, Z0, Z0, I1));

/// π/4 phase.
pub static PHASE_T: Lazy<Mat2> =
    Lazy::new(|| {
        Mat2::new(Z1, Z0, Z0, C64::cis(std::f64::consts::FRAC_PI_4))
    });

/// Rotation about *X*, exp(-*iθX*/2).
pub fn xrot(angle: f64) -> Mat2 {
    let c = C64::from((angle / 2.0).cos());
    let s = -I1 * (angle / 2.0).sin();
    Mat2::new(c, s, s, c)
}

/// Rotation about *Y*, exp(-*iθY*/2).
pub fn yrot(angle: f64) -> Mat2 {
    let c = C64::from((angle / 2.0).cos());
    let s = C64::from((angle / 2.0).sin());
    Mat2::new(c, -s, s, c)
}

/// Rotation about *Z*, exp(-*iθZ*/2).
pub fn zrot(angle: f64) -> Mat2 {
    Mat2::new(C64::cis(-angle / 2.0), Z0, Z0, C64::cis(angle / 2.0))
}

/// Phase shift diag(1, e<sup>*iφ*</sup>).
pub fn phase(angle: f64) -> Mat2 { Mat2::new(Z1, Z0, Z0, C64::cis(angle)) }

/// Controlled single-qubit gate as a 4×4 matrix with `control` as the first
/// (low-bit) operand.
pub fn controlled(gate: &Mat2) -> Mat4 {
    let mut m = Mat4::identity();
    // rows/cols 1 and 3 have the control bit set
    m[(1, 1)] = gate[(0, 0)];
    m[(1, 3)] = gate[(0, 1)];
    m[(3, 1)] = gate[(1, 0)];
    m[(3, 3)] = gate[(1, 1)];
    m
}

fn check_rows<R>(rows: &[R], expected: usize) -> SimResult<()>
where R: AsRef<[C64]>
{
    let bad_row
        = rows.iter()
        .map(|row| row.as_ref().len())
        .find(|len| *len != expected);
    match (rows.len() == expected, bad_row) {
        (true, None) => Ok(()),
        (_, cols) => Err(SimError::InvalidGateShape {
            expected,
            rows: rows.len(),
            cols: cols.unwrap_or(expected),
        }),
    }
}

/// Build a single-qubit gate from a row-major nested array, checking only its
/// shape.
pub fn mat2_from_rows<R>(rows: &[R]) -> SimResult<Mat2>
where R: AsRef<[C64]>
{
    check_rows(rows, 2)?;
    Ok(Mat2::from_fn(|i, j| rows[i].as_ref()[j]))
}

/// Build a two-qubit gate from a row-major nested array, checking only its
/// shape.
pub fn mat4_from_rows<R>(rows: &[R]) -> SimResult<Mat4>
where R: AsRef<[C64]>
{
    check_rows(rows, 4)?;
    Ok(Mat4::from_fn(|i, j| rows[i].as_ref()[j]))
}

/// Convert a dynamically sized matrix to a single-qubit gate.
pub fn mat2_from_dmatrix(m: &na::DMatrix<C64>) -> SimResult<Mat2> {
    if m.shape() != (2, 2) {
        return Err(SimError::InvalidGateShape {
            expected: 2, rows: m.nrows(), cols: m.ncols() });
    }
    Ok(Mat2::from_fn(|i, j| m[(i, j)]))
}

/// Convert a dynamically sized matrix to a two-qubit gate.
pub fn mat4_from_dmatrix(m: &na::DMatrix<C64>) -> SimResult<Mat4> {
    if m.shape() != (4, 4) {
        return Err(SimError::InvalidGateShape {
            expected: 4, rows: m.nrows(), cols: m.ncols() });
    }
    Ok(Mat4::from_fn(|i, j| m[(i, j)]))
}

/// Description of a single gate acting on specific qubits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gate {
    /// Hadamard
    H(usize),
    /// π rotation about X
    X(usize),
    /// π rotation about Y
    Y(usize),
    /// π rotation about Z
    Z(usize),
    /// π/2 rotation about Z
    S(usize),
    /// π/4 rotation about Z
    T(usize),
    /// Arbitrary rotation about X
    XRot(usize, f64),
    /// Arbitrary rotation about Y
    YRot(usize, f64),
    /// Arbitrary rotation about Z
    ZRot(usize, f64),
    /// Arbitrary single-qubit matrix
    U(usize, Mat2),
    /// Z-controlled π rotation about X.
    ///
    /// The first qubit index is the control.
    CX(usize, usize),
    /// Z-controlled π rotation about Z.
    ///
    /// The first qubit index is the control.
    CZ(usize, usize),
    /// Z-controlled arbitrary single-qubit matrix.
    ///
    /// The first qubit index is the control.
    CU(usize, usize, Mat2),
    /// Swap
    Swap(usize, usize),
    /// Arbitrary two-qubit matrix; the first index is the low bit.
    U2(usize, usize, Mat4),
}

impl Gate {
    /// Return `true` if `self` acts on two qubits.
    pub fn is_two_qubit(&self) -> bool {
        matches!(
            self,
            Self::CX(..) | Self::CZ(..) | Self::CU(..) | Self::Swap(..)
            | Self::U2(..)
        )
    }

    /// Return the qubit operands of `self`, in order.
    pub fn qubits(&self) -> (usize, Option<usize>) {
        match *self {
            Self::H(k)
            | Self::X(k)
            | Self::Y(k)
            | Self::Z(k)
            | Self::S(k)
            | Self::T(k)
            | Self::XRot(k, _)
            | Self::YRot(k, _)
            | Self::ZRot(k, _)
            | Self::U(k, _)
            => (k, None),
            Self::CX(a, b)
            | Self::CZ(a, b)
            | Self::CU(a, b, _)
            | Self::Swap(a, b)
            | Self::U2(a, b, _)
            => (a, Some(b)),
        }
    }

    /// Return the matrix of a single-qubit gate, or the target matrix of a
    /// controlled gate. Returns `None` for `Swap` and `U2`.
    pub fn matrix(&self) -> Option<Mat2> {
        match *self {
            Self::H(_) => Some(*HADAMARD),
            Self::X(_) | Self::CX(..) => Some(*PAULI_X),
            Self::Y(_) => Some(*PAULI_Y),
            Self::Z(_) | Self::CZ(..) => Some(*PAULI_Z),
            Self::S(_) => Some(*PHASE_S),
            Self::T(_) => Some(*PHASE_T),
            Self::XRot(_, ang) => Some(xrot(ang)),
            Self::YRot(_, ang) => Some(yrot(ang)),
            Self::ZRot(_, ang) => Some(zrot(ang)),
            Self::U(_, m) | Self::CU(_, _, m) => Some(m),
            Self::Swap(..) | Self::U2(..) => None,
        }
    }

    /// Return the inverse of `self`, assuming all matrices are unitary.
    pub fn inverse(&self) -> Self {
        match *self {
            Self::S(k) => Self::U(k, PHASE_S.adjoint()),
            Self::T(k) => Self::U(k, PHASE_T.adjoint()),
            Self::XRot(k, ang) => Self::XRot(k, -ang),
            Self::YRot(k, ang) => Self::YRot(k, -ang),
            Self::ZRot(k, ang) => Self::ZRot(k, -ang),
            Self::U(k, m) => Self::U(k, m.adjoint()),
            Self::CU(a, b, m) => Self::CU(a, b, m.adjoint()),
            Self::U2(a, b, m) => Self::U2(a, b, m.adjoint()),
            g => g,
        }
    }

    /// Sample a random single-qubit gate (`H`, `X`, `Y`, `Z`, `S`, `T`, or a
    /// rotation by a uniformly random angle) for a given qubit index.
    pub fn sample_single<R>(idx: usize, rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        use std::f64::consts::TAU;
        match rng.gen_range(0..9_usize) {
            0 => Self::H(idx),
            1 => Self::X(idx),
            2 => Self::Y(idx),
            3 => Self::Z(idx),
            4 => Self::S(idx),
            5 => Self::T(idx),
            6 => Self::XRot(idx, TAU * rng.gen::<f64>()),
            7 => Self::YRot(idx, TAU * rng.gen::<f64>()),
            8 => Self::ZRot(idx, TAU * rng.gen::<f64>()),
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_unitary(m: &Mat2) {
        let prod = m.adjoint() * m;
        for (a, b) in prod.iter().zip(Mat2::identity().iter()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn builtins_are_unitary() {
        assert_unitary(&HADAMARD);
        assert_unitary(&PAULI_X);
        assert_unitary(&PAULI_Y);
        assert_unitary(&PAULI_Z);
        assert_unitary(&PHASE_S);
        assert_unitary(&PHASE_T);
        assert_unitary(&xrot(0.37));
        assert_unitary(&yrot(-1.2));
        assert_unitary(&zrot(2.5));
    }

    #[test]
    fn xrot_pi_is_x_up_to_phase() {
        let m = xrot(std::f64::consts::PI);
        let x = PAULI_X.map(|z| -I1 * z);
        for (a, b) in m.iter().zip(x.iter()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn shape_is_checked() {
        let good = vec![vec![Z1, Z0], vec![Z0, Z1]];
        assert_eq!(mat2_from_rows(&good).unwrap(), Mat2::identity());

        let short = vec![vec![Z1, Z0], vec![Z0]];
        assert_eq!(
            mat2_from_rows(&short),
            Err(SimError::InvalidGateShape { expected: 2, rows: 2, cols: 1 }),
        );
        assert!(mat4_from_rows(&good).is_err());

        let d = na::DMatrix::<C64>::identity(3, 3);
        assert_eq!(
            mat2_from_dmatrix(&d),
            Err(SimError::InvalidGateShape { expected: 2, rows: 3, cols: 3 }),
        );
        let d = na::DMatrix::<C64>::identity(4, 4);
        assert_eq!(mat4_from_dmatrix(&d).unwrap(), Mat4::identity());
    }

    #[test]
    fn controlled_x_matrix() {
        let cx = controlled(&PAULI_X);
        // |c=1, t=0> (index 1) <-> |c=1, t=1> (index 3)
        assert_eq!(cx[(0, 0)], Z1);
        assert_eq!(cx[(2, 2)], Z1);
        assert_eq!(cx[(1, 3)], Z1);
        assert_eq!(cx[(3, 1)], Z1);
        assert_eq!(cx[(1, 1)], Z0);
    }

    #[test]
    fn inverse_of_rotation_negates_angle() {
        assert_eq!(Gate::XRot(2, 0.5).inverse(), Gate::XRot(2, -0.5));
        assert_eq!(Gate::H(1).inverse(), Gate::H(1));
        assert_eq!(Gate::CX(0, 1).qubits(), (0, Some(1)));
        assert!(Gate::Swap(0, 1).matrix().is_none());
    }
}
