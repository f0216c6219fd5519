//! Diagonal cost functions and the QAOA layers built on them.
//!
//! A cost function assigns a real value *C*<sub>*k*</sub> to every basis state
//! *k*. For Max-Cut on a graph of *N* vertices, vertex *v* is qubit *v* and
//! *C*<sub>*k*</sub> counts the edges whose endpoints take different bit values
//! in *k*.

use nalgebra as na;
use rayon::prelude::*;
use tracing::debug;
use crate::{
    config::SimConfig,
    error::{ SimError, SimResult },
    kernel,
    pauli::{ PauliString, PauliSum },
    register::{ QubitRegister, MAX_QUBITS },
};

/// Symmetric 0/1 adjacency matrix of an undirected graph.
///
/// Only the strict upper triangle is read: vertices *i* < *j* share an edge if
/// entry (*i*, *j*) is non-zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Adjacency {
    data: na::DMatrix<u8>,
}

impl Adjacency {
    /// Wrap an adjacency matrix.
    ///
    /// Fails with [`SimError::InvalidConfiguration`] if the matrix is not
    /// square or has zero or more than [`MAX_QUBITS`] rows.
    pub fn new(data: na::DMatrix<u8>) -> SimResult<Self> {
        let (rows, cols) = data.shape();
        if rows != cols {
            return Err(SimError::InvalidConfiguration(
                format!("adjacency matrix must be square, got {rows}x{cols}")
            ));
        }
        if rows < 1 || rows > MAX_QUBITS {
            return Err(SimError::InvalidConfiguration(
                format!("number of vertices must be in 1..={MAX_QUBITS}, got {rows}")
            ));
        }
        Ok(Self { data })
    }

    /// Build from row slices.
    pub fn from_rows<R>(rows: &[R]) -> SimResult<Self>
    where R: AsRef<[u8]>
    {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != n) {
            return Err(SimError::InvalidConfiguration(
                format!(
                    "adjacency matrix must be square, got a row of length {} \
                    with {} rows",
                    bad.as_ref().len(), n,
                )
            ));
        }
        Self::new(na::DMatrix::from_fn(n, n, |i, j| rows[i].as_ref()[j]))
    }

    /// Build an `n`-vertex graph from a list of edges.
    ///
    /// Self-loops and out-of-range vertices are rejected.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> SimResult<Self> {
        let mut data: na::DMatrix<u8> = na::DMatrix::zeros(n, n);
        for &(i, j) in edges.iter() {
            if i >= n || j >= n {
                return Err(SimError::InvalidConfiguration(
                    format!("edge ({i}, {j}) is out of range for {n} vertices")
                ));
            }
            if i == j {
                return Err(SimError::InvalidConfiguration(
                    format!("self-loop on vertex {i}")
                ));
            }
            data[(i, j)] = 1;
            data[(j, i)] = 1;
        }
        Self::new(data)
    }

    pub fn num_vertices(&self) -> usize { self.data.nrows() }

    /// Return all edges (*i*, *j*) with *i* < *j*, in row-major order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let n = self.num_vertices();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.data[(i, j)] != 0)
            .collect()
    }

    /// Return the Max-Cut Hamiltonian Σ<sub>(*i*, *j*)</sub> (1 - *Z*<sub>*i*</sub>*Z*<sub>*j*</sub>) / 2
    /// as a sum of Pauli strings.
    pub fn cut_observable(&self) -> SimResult<PauliSum> {
        let edges = self.edges();
        let mut obs = PauliSum::new();
        obs.push(PauliString::identity(0.5 * edges.len() as f64));
        for (i, j) in edges.into_iter() {
            obs.push(PauliString::from_codes(&[i, j], &[3, 3], -0.5)?);
        }
        Ok(obs)
    }
}

/// Real cost value for every computational basis state.
#[derive(Clone, Debug, PartialEq)]
pub struct CostFunction {
    values: Vec<f64>,
    max: f64,
}

impl CostFunction {
    /// Tabulate the cut value of every vertex partition of a graph, returning
    /// the table and the maximum cut.
    ///
    /// Tables of at least the default
    /// [`SimConfig::parallel_threshold`] entries are filled in parallel.
    pub fn max_cut(adj: &Adjacency) -> (Self, usize) {
        let n = adj.num_vertices();
        let masks: Vec<usize>
            = adj.edges().into_iter()
            .map(|(i, j)| (1 << i) | (1 << j))
            .collect();
        let cut = |k: usize| -> usize {
            masks.iter()
                .filter(|m| (k & **m).count_ones() == 1)
                .count()
        };
        let dim: usize = 1 << n;
        let cuts: Vec<usize>
            = if SimConfig::default().parallel_for(dim) {
                (0..dim).into_par_iter().map(cut).collect()
            } else {
                (0..dim).map(cut).collect()
            };
        let max_cut = cuts.iter().copied().max().unwrap_or(0);
        debug!(
            num_vertices = n,
            num_edges = masks.len(),
            max_cut,
            "tabulated max-cut cost function",
        );
        let values: Vec<f64> = cuts.into_iter().map(|c| c as f64).collect();
        (Self { values, max: max_cut as f64 }, max_cut)
    }

    /// Wrap an arbitrary table of costs.
    ///
    /// The table length must be 2<sup>*N*</sup> for some 1 ≤ *N* ≤
    /// [`MAX_QUBITS`], and every value must be finite.
    pub fn from_values(values: Vec<f64>) -> SimResult<Self> {
        let len = values.len();
        if len < 2 || !len.is_power_of_two() || len > 1 << MAX_QUBITS {
            return Err(SimError::InvalidConfiguration(
                format!("cost table length must be 2^N with 1 <= N <= {MAX_QUBITS}, got {len}")
            ));
        }
        if let Some(k) = values.iter().position(|c| !c.is_finite()) {
            return Err(SimError::InvalidConfiguration(
                format!("cost of basis state {k} is not finite")
            ));
        }
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self { values, max })
    }

    pub fn num_qubits(&self) -> usize { self.values.len().trailing_zeros() as usize }

    pub fn values(&self) -> &[f64] { &self.values }

    pub fn max_value(&self) -> f64 { self.max }

    fn check_register(&self, reg: &QubitRegister) -> SimResult<()> {
        if self.values.len() == reg.dim() {
            Ok(())
        } else {
            Err(SimError::InvalidConfiguration(
                format!(
                    "cost table has {} entries but the register has {} amplitudes",
                    self.values.len(), reg.dim(),
                )
            ))
        }
    }

    /// Compute Σ<sub>*k*</sub> *C*<sub>*k*</sub> |*a*<sub>*k*</sub>|².
    pub fn expectation(&self, reg: &QubitRegister) -> SimResult<f64> {
        self.check_register(reg)?;
        let e: f64
            = self.values.iter().zip(reg.amplitudes())
            .map(|(c, a)| c * a.norm_sqr())
            .sum();
        Ok(e)
    }

    /// Bin the probability mass of `reg` by cost value.
    ///
    /// Returns `max_cut + 1` bins, where bin *c* holds the total probability of
    /// basis states with cost *c*. Costs that are not within the register's
    /// tolerance of an integer in `0..=max_cut` are skipped.
    pub fn histogram(&self, reg: &QubitRegister, max_cut: usize)
        -> SimResult<Vec<f64>>
    {
        self.check_register(reg)?;
        let tol = reg.config().norm_tol;
        let nbins = max_cut.checked_add(1)
            .ok_or_else(|| SimError::InvalidConfiguration(
                format!("cannot allocate {max_cut} + 1 histogram bins")))?;
        let mut bins: Vec<f64> = vec![0.0; nbins];
        for (c, a) in self.values.iter().zip(reg.amplitudes()) {
            let r = c.round();
            if (c - r).abs() > tol || r < 0.0 || r > max_cut as f64 { continue; }
            bins[r as usize] += a.norm_sqr();
        }
        Ok(bins)
    }
}

impl QubitRegister {
    /// Apply the phase layer exp(-*iγC*), multiplying each amplitude
    /// *a*<sub>*k*</sub> by exp(-*iγC*<sub>*k*</sub>).
    pub fn apply_cost_layer(&mut self, cost: &CostFunction, gamma: f64)
        -> SimResult<&mut Self>
    {
        cost.check_register(self)?;
        let par = self.parallel();
        kernel::apply_diagonal_phase(&mut self.amps, &cost.values, gamma, par);
        Ok(self)
    }

    /// Apply the transverse-field mixer exp(-*iβ* Σ<sub>*q*</sub> *X*<sub>*q*</sub>),
    /// i.e. an X rotation by 2*β* on every qubit.
    pub fn apply_mixing_layer(&mut self, beta: f64) -> SimResult<&mut Self> {
        for k in 0..self.n { self.apply_rx(k, 2.0 * beta)?; }
        Ok(self)
    }
}
