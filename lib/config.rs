//! Per-register tuning knobs.

/// Numerical and scheduling settings attached to a
/// [`QubitRegister`][crate::register::QubitRegister].
///
/// None of these change results: kernels produce the same amplitudes whether
/// or not they run in parallel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Minimum number of amplitudes before gate kernels and phase layers are
    /// split across the rayon thread pool.
    pub parallel_threshold: usize,
    /// Tolerance used by [`QubitRegister::is_normalized`][crate::register::QubitRegister::is_normalized]
    /// and when validating histogram bins against integer cost values.
    pub norm_tol: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { parallel_threshold: 1 << 14, norm_tol: 1e-10 }
    }
}

impl SimConfig {
    /// Set the parallelization threshold. Zero parallelizes everything;
    /// `usize::MAX` disables parallelism entirely.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the normalization tolerance.
    pub fn with_norm_tol(mut self, tol: f64) -> Self {
        self.norm_tol = tol.abs();
        self
    }

    /// Always run register kernels and QAOA grid scans on the calling thread.
    ///
    /// [`CostFunction::max_cut`][crate::cost::CostFunction::max_cut] is not
    /// tied to a register and always uses the default threshold.
    pub fn sequential() -> Self {
        Self::default().with_parallel_threshold(usize::MAX)
    }

    /// Return `true` if nothing is ever split across threads.
    pub fn is_sequential(&self) -> bool { self.parallel_threshold == usize::MAX }

    pub(crate) fn parallel_for(&self, dim: usize) -> bool {
        dim >= self.parallel_threshold
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn thresholds() {
        let seq = SimConfig::sequential();
        assert!(seq.is_sequential());
        assert!(!seq.parallel_for(1 << 30));
        let def = SimConfig::default();
        assert!(!def.is_sequential());
        assert!(!def.parallel_for((1 << 14) - 1));
        assert!(def.parallel_for(1 << 14));
        assert_eq!(def.with_norm_tol(-1e-6).norm_tol, 1e-6);
    }
}
