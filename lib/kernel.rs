//! In-place update kernels over a raw amplitude slice.
//!
//! Every kernel partitions the slice into aligned chunks of size
//! 2<sup>*h*+1</sup>, where *h* is the highest qubit index involved, so that all
//! amplitudes coupled by the operation live in the same chunk. Chunks are
//! disjoint, which makes the parallel and sequential paths produce identical
//! amplitudes.
//!
//! Callers are responsible for bounds and distinctness checks on qubit indices;
//! see [`QubitRegister`][crate::register::QubitRegister].

use num_complex::Complex64 as C64;
use rayon::prelude::*;
use crate::gate::{ Mat2, Mat4 };

macro_rules! for_each_chunk {
    ( $state:expr, $size:expr, $parallel:expr, $f:expr ) => {
        if $parallel {
            $state.par_chunks_mut($size).for_each($f)
        } else {
            $state.chunks_mut($size).for_each($f)
        }
    }
}

#[inline]
fn mix(g: &Mat2, a: C64, b: C64) -> (C64, C64) {
    (
        g[(0, 0)] * a + g[(0, 1)] * b,
        g[(1, 0)] * a + g[(1, 1)] * b,
    )
}

/// Apply a 2×2 matrix to qubit `k`.
///
/// Each of the 2<sup>*N*-1</sup> pairs of amplitudes differing only in bit `k`
/// is updated exactly once.
pub fn apply_gate1(state: &mut [C64], k: usize, gate: &Mat2, parallel: bool) {
    let stride: usize = 1 << k;
    for_each_chunk!(
        state, stride << 1, parallel,
        |chunk: &mut [C64]| {
            let (lo, hi) = chunk.split_at_mut(stride);
            lo.iter_mut().zip(hi.iter_mut())
                .for_each(|(a, b)| { (*a, *b) = mix(gate, *a, *b); });
        }
    );
}

/// Apply a 2×2 matrix to qubit `t` on only the pairs where qubit `c` is ∣1⟩.
pub fn apply_controlled1(
    state: &mut [C64],
    c: usize,
    t: usize,
    gate: &Mat2,
    parallel: bool,
) {
    let cmask: usize = 1 << c;
    let tmask: usize = 1 << t;
    let size: usize = 2 << c.max(t);
    for_each_chunk!(
        state, size, parallel,
        |chunk: &mut [C64]| {
            for l in 0..chunk.len() {
                if l & cmask == 0 || l & tmask != 0 { continue; }
                let (a, b) = mix(gate, chunk[l], chunk[l | tmask]);
                chunk[l] = a;
                chunk[l | tmask] = b;
            }
        }
    );
}

/// Apply a 4×4 matrix to qubits `a` (low bit of the matrix index) and `b`
/// (high bit).
pub fn apply_gate2(
    state: &mut [C64],
    a: usize,
    b: usize,
    gate: &Mat4,
    parallel: bool,
) {
    let amask: usize = 1 << a;
    let bmask: usize = 1 << b;
    let size: usize = 2 << a.max(b);
    for_each_chunk!(
        state, size, parallel,
        |chunk: &mut [C64]| {
            let mut v = [C64::from(0.0); 4];
            for l in 0..chunk.len() {
                if l & (amask | bmask) != 0 { continue; }
                let idx = [l, l | amask, l | bmask, l | amask | bmask];
                idx.iter().zip(v.iter_mut())
                    .for_each(|(i, vi)| { *vi = chunk[*i]; });
                for (r, i) in idx.iter().enumerate() {
                    chunk[*i]
                        = (0..4).map(|s| gate[(r, s)] * v[s]).sum::<C64>();
                }
            }
        }
    );
}

/// Exchange the states of qubits `a` and `b`.
pub fn apply_swap(state: &mut [C64], a: usize, b: usize, parallel: bool) {
    let amask: usize = 1 << a;
    let bmask: usize = 1 << b;
    let size: usize = 2 << a.max(b);
    for_each_chunk!(
        state, size, parallel,
        |chunk: &mut [C64]| {
            for l in 0..chunk.len() {
                if l & amask != 0 && l & bmask == 0 {
                    chunk.swap(l, (l ^ amask) | bmask);
                }
            }
        }
    );
}

/// Multiply each amplitude by exp(-*iγc*) for its entry *c* in `diag`.
pub fn apply_diagonal_phase(
    state: &mut [C64],
    diag: &[f64],
    gamma: f64,
    parallel: bool,
) {
    if parallel {
        state.par_iter_mut().zip(diag.par_iter())
            .for_each(|(a, c)| { *a *= C64::cis(-gamma * c); });
    } else {
        state.iter_mut().zip(diag.iter())
            .for_each(|(a, c)| { *a *= C64::cis(-gamma * c); });
    }
}

/// Zero every amplitude whose bit `k` differs from `keep_one`.
pub fn zero_branch(state: &mut [C64], k: usize, keep_one: bool, parallel: bool) {
    let stride: usize = 1 << k;
    for_each_chunk!(
        state, stride << 1, parallel,
        |chunk: &mut [C64]| {
            let (lo, hi) = chunk.split_at_mut(stride);
            let dead = if keep_one { lo } else { hi };
            dead.iter_mut().for_each(|a| { *a = C64::from(0.0); });
        }
    );
}

/// Multiply every amplitude by a real factor.
pub fn scale(state: &mut [C64], factor: f64, parallel: bool) {
    if parallel {
        state.par_iter_mut().for_each(|a| { *a *= factor; });
    } else {
        state.iter_mut().for_each(|a| { *a *= factor; });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{ rngs::StdRng, Rng, SeedableRng };
    use crate::gate::{ self, HADAMARD, PAULI_X };

    fn random_state(n: usize, seed: u64) -> Vec<C64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..1_usize << n)
            .map(|_| C64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect()
    }

    #[test]
    fn x_swaps_pairs() {
        let mut state: Vec<C64>
            = (0..8).map(|k| C64::from(k as f64)).collect();
        apply_gate1(&mut state, 1, &PAULI_X, false);
        let expected: Vec<C64>
            = [2, 3, 0, 1, 6, 7, 4, 5].iter()
            .map(|k| C64::from(*k as f64))
            .collect();
        assert_eq!(state, expected);
    }

    #[test]
    fn controlled_touches_only_control_one() {
        let mut state: Vec<C64>
            = (0..8).map(|k| C64::from(k as f64)).collect();
        // control 2, target 0: swap 4 <-> 5 and 6 <-> 7
        apply_controlled1(&mut state, 2, 0, &PAULI_X, false);
        let expected: Vec<C64>
            = [0, 1, 2, 3, 5, 4, 7, 6].iter()
            .map(|k| C64::from(*k as f64))
            .collect();
        assert_eq!(state, expected);
    }

    #[test]
    fn swap_exchanges_bits() {
        let mut state: Vec<C64>
            = (0..8).map(|k| C64::from(k as f64)).collect();
        apply_swap(&mut state, 0, 2, false);
        // index bits (q2 q1 q0): 001 <-> 100, 011 <-> 110
        let expected: Vec<C64>
            = [0, 4, 2, 6, 1, 5, 3, 7].iter()
            .map(|k| C64::from(*k as f64))
            .collect();
        assert_eq!(state, expected);
    }

    #[test]
    fn gate2_controlled_matches_controlled1() {
        let cu = gate::yrot(0.9);
        let mut a = random_state(4, 3);
        let mut b = a.clone();
        apply_controlled1(&mut a, 3, 1, &cu, false);
        apply_gate2(&mut b, 3, 1, &gate::controlled(&cu), false);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).norm() < 1e-12);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut seq = random_state(6, 11);
        let mut par = seq.clone();
        let diag: Vec<f64> = (0..64).map(|k| (k % 5) as f64).collect();
        for (s, p) in [(&mut seq, false), (&mut par, true)] {
            apply_gate1(s, 0, &HADAMARD, p);
            apply_gate1(s, 5, &gate::xrot(0.3), p);
            apply_controlled1(s, 4, 2, &PAULI_X, p);
            apply_gate2(s, 1, 3, &gate::controlled(&gate::zrot(1.1)), p);
            apply_swap(s, 0, 5, p);
            apply_diagonal_phase(s, &diag, 0.7, p);
            zero_branch(s, 3, true, p);
            scale(s, 2.0, p);
        }
        assert_eq!(seq, par);
    }
}
