//! Driver for layered QAOA circuits over a diagonal cost function.

use std::f64::consts::{ FRAC_PI_2, PI };
use rand::{ rngs::StdRng, SeedableRng };
use rayon::prelude::*;
use tracing::{ debug, trace };
use crate::{
    config::SimConfig,
    cost::CostFunction,
    error::{ SimError, SimResult },
    register::{ Init, QubitRegister },
};

/// A single evaluated point of a (γ, β) parameter scan.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridPoint {
    pub gamma: f64,
    pub beta: f64,
    /// Expected cost of the prepared state.
    pub value: f64,
}

/// Main driver for preparing QAOA states.
///
/// Each run starts from the uniform superposition over all basis states and
/// applies `layers` rounds of the cost phase layer followed by the mixer.
#[derive(Clone, Debug)]
pub struct QaoaCircuit {
    cost: CostFunction,
    layers: usize,
    config: SimConfig,
}

impl QaoaCircuit {
    /// Create a new circuit with `layers` ≥ 1 rounds.
    pub fn new(cost: CostFunction, layers: usize) -> SimResult<Self> {
        if layers < 1 {
            return Err(SimError::InvalidConfiguration(
                "a QAOA circuit needs at least one layer".into()));
        }
        Ok(Self { cost, layers, config: SimConfig::default() })
    }

    /// Use non-default settings for every register prepared by `self`.
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cost(&self) -> &CostFunction { &self.cost }

    /// Return the number of layers, always at least 1.
    pub fn layers(&self) -> usize { self.layers }

    pub fn config(&self) -> &SimConfig { &self.config }

    /// Number of angles expected by [`Self::run`]: one γ and one β per layer.
    pub fn num_params(&self) -> usize { 2 * self.layers }

    /// Prepare the QAOA state for `params` = [γ<sub>1</sub>, ...,
    /// γ<sub>*p*</sub>, β<sub>1</sub>, ..., β<sub>*p*</sub>], optionally
    /// seeding the returned register's generator.
    pub fn run(&self, params: &[f64], seed: Option<u64>)
        -> SimResult<QubitRegister>
    {
        if params.len() != self.num_params() {
            return Err(SimError::InvalidConfiguration(
                format!(
                    "expected {} parameters for {} layers, got {}",
                    self.num_params(), self.layers, params.len(),
                )
            ));
        }
        let rng
            = seed.map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);
        let n = self.cost.num_qubits();
        let mut reg
            = QubitRegister::with_config(n, Init::Basis(0), rng, self.config)?;
        for k in 0..n { reg.apply_h(k)?; }
        let (gammas, betas) = params.split_at(self.layers);
        for (gamma, beta) in gammas.iter().zip(betas) {
            reg.apply_cost_layer(&self.cost, *gamma)?
                .apply_mixing_layer(*beta)?;
        }
        trace!(layers = self.layers, ?params, "prepared QAOA state");
        Ok(reg)
    }

    /// Prepare the QAOA state for `params` and return its expected cost.
    pub fn expected_cost(&self, params: &[f64]) -> SimResult<f64> {
        let reg = self.run(params, Some(0))?;
        self.cost.expectation(&reg)
    }

    /// Evaluate the expected cost of a single-layer circuit on a `steps` ×
    /// `steps` grid over γ ∈ [0, π) and β ∈ [0, π/2).
    ///
    /// Points are returned with γ varying slowest. Points are evaluated in
    /// parallel unless the attached config is [`SimConfig::sequential`].
    pub fn landscape(&self, steps: usize) -> SimResult<Vec<GridPoint>> {
        if self.layers != 1 {
            return Err(SimError::InvalidConfiguration(
                format!("grid scans need exactly 1 layer, got {}", self.layers)
            ));
        }
        if steps < 1 {
            return Err(SimError::InvalidConfiguration(
                "grid scans need at least one step per axis".into()));
        }
        let dgamma = PI / steps as f64;
        let dbeta = FRAC_PI_2 / steps as f64;
        let point = |ij: usize| -> SimResult<GridPoint> {
            let gamma = dgamma * (ij / steps) as f64;
            let beta = dbeta * (ij % steps) as f64;
            let value = self.expected_cost(&[gamma, beta])?;
            Ok(GridPoint { gamma, beta, value })
        };
        let npoints = steps.checked_mul(steps)
            .ok_or_else(|| SimError::InvalidConfiguration(
                format!("a {steps}x{steps} grid is too large")))?;
        if self.config.is_sequential() {
            (0..npoints).map(point).collect()
        } else {
            (0..npoints).into_par_iter().map(point).collect()
        }
    }

    /// Return the point of [`Self::landscape`] with the largest expected cost.
    ///
    /// Ties go to the point listed first.
    pub fn grid_search(&self, steps: usize) -> SimResult<GridPoint> {
        let points = self.landscape(steps)?;
        let mut best = points[0];
        for p in points.into_iter().skip(1) {
            if p.value > best.value { best = p; }
        }
        debug!(
            steps,
            gamma = best.gamma,
            beta = best.beta,
            value = best.value,
            "finished grid search",
        );
        Ok(best)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::cost::Adjacency;

    fn single_edge() -> QaoaCircuit {
        let adj = Adjacency::from_edges(2, &[(0, 1)]).unwrap();
        QaoaCircuit::new(CostFunction::max_cut(&adj).0, 1).unwrap()
    }

    #[test]
    fn parameter_count() {
        let adj = Adjacency::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let cost = CostFunction::max_cut(&adj).0;
        assert!(QaoaCircuit::new(cost.clone(), 0).is_err());
        let circ = QaoaCircuit::new(cost, 3).unwrap();
        assert_eq!(circ.num_params(), 6);
        assert!(circ.run(&[0.1; 5], None).is_err());
        let reg = circ.run(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], None).unwrap();
        assert_eq!(reg.num_qubits(), 3);
        assert!(reg.is_normalized());
    }

    #[test]
    fn zero_angles_give_uniform_state() {
        let adj = Adjacency::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let circ = QaoaCircuit::new(CostFunction::max_cut(&adj).0, 2).unwrap();
        let reg = circ.run(&[0.0; 4], Some(1)).unwrap();
        for p in reg.probabilities() {
            assert_abs_diff_eq!(p, 1.0 / 16.0, epsilon = 1e-12);
        }
        // half of all edges are cut on average
        assert_abs_diff_eq!(
            circ.expected_cost(&[0.0; 4]).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn expected_cost_matches_register() {
        let circ = single_edge();
        let params = [0.7, 0.2];
        let reg = circ.run(&params, Some(5)).unwrap();
        assert_eq!(
            circ.expected_cost(&params).unwrap(),
            circ.cost().expectation(&reg).unwrap(),
        );
    }

    #[test]
    fn grid_search_single_edge() {
        let circ = single_edge();
        let best = circ.grid_search(8).unwrap();
        assert_abs_diff_eq!(best.value, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(best.gamma, FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(circ.landscape(8).unwrap().len(), 64);
    }

    #[test]
    fn accessors() {
        let circ = single_edge().with_config(SimConfig::sequential());
        assert_eq!(circ.layers(), 1);
        assert_eq!(circ.cost().num_qubits(), 2);
        assert!(circ.config().is_sequential());
    }

    #[test]
    fn grid_search_validation() {
        let circ = single_edge();
        assert!(circ.grid_search(0).is_err());
        assert!(circ.landscape(usize::MAX).is_err());
        let deep = QaoaCircuit::new(circ.cost().clone(), 2).unwrap();
        assert!(deep.grid_search(4).is_err());
    }

    #[test]
    fn parallel_config_does_not_change_landscape() {
        let adj = Adjacency::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        let cost = CostFunction::max_cut(&adj).0;
        let seq = QaoaCircuit::new(cost.clone(), 1).unwrap()
            .with_config(SimConfig::sequential());
        let par = QaoaCircuit::new(cost, 1).unwrap()
            .with_config(SimConfig::default().with_parallel_threshold(0));
        assert_eq!(seq.landscape(3).unwrap(), par.landscape(3).unwrap());
    }
}
