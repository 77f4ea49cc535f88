use serde::Serialize;

use crate::calibration::CellBoosts;
use crate::strength::ExpectedGoalsPair;

/// Joint probabilities indexed by (home goals, away goals), both in
/// `0..=max_goals`. Entries are non-negative and sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    max_goals: usize,
    cells: Vec<f64>,
}

impl ScoreMatrix {
    /// Builds a matrix from unnormalized non-negative weights laid out row by
    /// row (home goals major).
    pub fn from_weights(max_goals: usize, mut cells: Vec<f64>) -> Self {
        let side = max_goals + 1;
        cells.resize(side * side, 0.0);
        for c in cells.iter_mut() {
            if !c.is_finite() || *c < 0.0 {
                *c = 0.0;
            }
        }
        let mut out = Self { max_goals, cells };
        out.renormalize();
        out
    }

    pub fn max_goals(&self) -> usize {
        self.max_goals
    }

    pub fn side(&self) -> usize {
        self.max_goals + 1
    }

    pub fn get(&self, home: usize, away: usize) -> f64 {
        if home > self.max_goals || away > self.max_goals {
            return 0.0;
        }
        self.cells[home * self.side() + away]
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// `(home, away, p)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let side = self.side();
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, p)| (idx / side, idx % side, *p))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.side())
    }

    pub fn home_goals_marginal(&self, goals: usize) -> f64 {
        (0..self.side()).map(|a| self.get(goals, a)).sum()
    }

    pub fn away_goals_marginal(&self, goals: usize) -> f64 {
        (0..self.side()).map(|h| self.get(h, goals)).sum()
    }

    /// Returns a copy with the listed cells multiplied, renormalized.
    pub fn reweighted(&self, factors: impl IntoIterator<Item = (usize, usize, f64)>) -> Self {
        let mut cells = self.cells.clone();
        let side = self.side();
        for (h, a, f) in factors {
            if h <= self.max_goals && a <= self.max_goals {
                cells[h * side + a] *= f;
            }
        }
        Self::from_weights(self.max_goals, cells)
    }

    pub(crate) fn raw(&self) -> &[f64] {
        &self.cells
    }

    fn renormalize(&mut self) {
        let sum: f64 = self.cells.iter().sum();
        if sum > 0.0 && sum.is_finite() {
            for c in self.cells.iter_mut() {
                *c /= sum;
            }
        } else {
            let uniform = 1.0 / self.cells.len() as f64;
            self.cells.iter_mut().for_each(|c| *c = uniform);
        }
    }
}

/// Seam between the ensemble and the grid construction, so the pipeline can
/// be driven with an instrumented builder.
pub trait MatrixBuilder {
    fn build(
        &self,
        rates: ExpectedGoalsPair,
        rho: f64,
        max_goals: usize,
        boosts: &CellBoosts,
    ) -> ScoreMatrix;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BivariatePoisson;

impl MatrixBuilder for BivariatePoisson {
    fn build(
        &self,
        rates: ExpectedGoalsPair,
        rho: f64,
        max_goals: usize,
        boosts: &CellBoosts,
    ) -> ScoreMatrix {
        build_matrix_with(rates, rho, max_goals, boosts)
    }
}

/// Correlated Poisson grid with the default tournament cell boosts.
pub fn build_matrix(rates: ExpectedGoalsPair, rho: f64, max_goals: usize) -> ScoreMatrix {
    build_matrix_with(rates, rho, max_goals, &CellBoosts::default())
}

pub fn build_matrix_with(
    rates: ExpectedGoalsPair,
    rho: f64,
    max_goals: usize,
    boosts: &CellBoosts,
) -> ScoreMatrix {
    let pmf_h = poisson_pmf(rates.home, max_goals);
    let pmf_a = poisson_pmf(rates.away, max_goals);

    let mut cells = Vec::with_capacity(pmf_h.len() * pmf_a.len());
    for (h, p_h) in pmf_h.iter().enumerate() {
        for (a, p_a) in pmf_a.iter().enumerate() {
            let tau = correlation_factor(h, a, rates.home, rates.away, rho);
            cells.push(p_h * p_a * tau * boosts.factor(h, a));
        }
    }
    ScoreMatrix::from_weights(max_goals, cells)
}

/// First-order bivariate correction for the low-count cells. Floored at zero
/// so an extreme rho cannot produce negative mass.
pub fn correlation_factor(home: usize, away: usize, lambda_home: f64, lambda_away: f64, rho: f64) -> f64 {
    let f = match (home, away) {
        (0, 0) => (rho * lambda_home * lambda_away).exp(),
        (0, _) | (_, 0) => 1.0 + rho * lambda_home * lambda_away / 2.0,
        (1, 1) => 1.0 - rho,
        _ => 1.0,
    };
    f.max(0.0)
}

/// Poisson masses for 0..=max_k, truncated (not tail-filled).
pub fn poisson_pmf(lambda: f64, max_k: usize) -> Vec<f64> {
    let lambda = lambda.max(0.0);
    let mut out = vec![0.0; max_k + 1];
    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}
