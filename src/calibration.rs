use serde::{Deserialize, Serialize};

use crate::error::{EstimatorError, Result};
use crate::profile::FORM_LEN;

/// Largest supported goal bound per side; the grid holds `(n + 1)^2` cells.
pub const MAX_GOALS_CAP: usize = 15;

/// Hand-tuned tournament constants. None of these have a derivation; they are
/// opaque calibration values kept together so they can be swapped wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub rho: f64,
    pub max_goals: usize,

    /// Oldest first, so the heaviest weight sits on the most recent match.
    pub form_weights: [f64; FORM_LEN],
    pub form_sensitivity: f64,

    pub defense_pivot: f64,
    pub quality_home: f64,
    pub quality_away: f64,
    pub xg_ratio_floor: f64,
    pub xg_ratio_blend: f64,
    pub pressing_home: f64,
    pub pressing_away: f64,
    pub style: StyleRule,
    pub variance_damping: f64,
    pub injury_damping: f64,

    pub tournament_home: f64,
    pub tournament_away: f64,
    pub home_rate_range: (f64, f64),
    pub away_rate_range: (f64, f64),

    pub cell_boosts: CellBoosts,
    pub ensemble: EnsemblePolicy,
}

/// Counter-attacking side meets a high defensive line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub counter_threshold: f64,
    pub line_threshold: f64,
    pub boost: f64,
    pub penalty: f64,
}

/// Per-cell reweighting of the score grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellBoosts {
    pub cells: Vec<CellFactor>,
    /// Applied to any cell with more total goals than `high_total_goals`
    /// that has no explicit entry.
    pub high_total_goals: usize,
    pub high_total_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellFactor {
    pub home: usize,
    pub away: usize,
    pub factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsemblePolicy {
    pub neutral_weight: f64,
    pub conservative_weight: f64,
    pub aggressive_weight: f64,
    pub conservative_scale: f64,
    pub aggressive_home_cap: f64,
    pub aggressive_away_cap: f64,
    pub strength_floor: f64,
    pub final_nudges: Vec<CellFactor>,
}

const fn cell(home: usize, away: usize, factor: f64) -> CellFactor {
    CellFactor { home, away, factor }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            rho: -0.15,
            max_goals: 6,
            form_weights: [0.03, 0.07, 0.20, 0.30, 0.40],
            form_sensitivity: 0.35,
            defense_pivot: 2.0,
            quality_home: 0.30,
            quality_away: 0.25,
            xg_ratio_floor: 0.5,
            xg_ratio_blend: 0.3,
            pressing_home: 0.15,
            pressing_away: 0.12,
            style: StyleRule::default(),
            variance_damping: 0.15,
            injury_damping: 0.20,
            tournament_home: 0.92,
            tournament_away: 0.88,
            home_rate_range: (0.25, 3.2),
            away_rate_range: (0.20, 2.8),
            cell_boosts: CellBoosts::default(),
            ensemble: EnsemblePolicy::default(),
        }
    }
}

impl Default for StyleRule {
    fn default() -> Self {
        Self {
            counter_threshold: 0.65,
            line_threshold: 0.45,
            boost: 1.12,
            penalty: 0.92,
        }
    }
}

impl Default for CellBoosts {
    fn default() -> Self {
        Self {
            cells: vec![
                cell(0, 0, 1.32),
                cell(1, 0, 1.25),
                cell(0, 1, 1.20),
                cell(1, 1, 1.18),
                cell(2, 0, 1.10),
                cell(0, 2, 1.05),
                cell(2, 1, 1.08),
            ],
            high_total_goals: 4,
            high_total_factor: 0.75,
        }
    }
}

impl Default for EnsemblePolicy {
    fn default() -> Self {
        Self {
            neutral_weight: 0.55,
            conservative_weight: 0.25,
            aggressive_weight: 0.20,
            conservative_scale: 0.90,
            aggressive_home_cap: 1.15,
            aggressive_away_cap: 1.10,
            strength_floor: 0.05,
            final_nudges: vec![
                cell(0, 0, 1.05),
                cell(1, 0, 1.08),
                cell(0, 1, 1.06),
                cell(1, 1, 1.04),
            ],
        }
    }
}

impl CellBoosts {
    /// No reweighting at all: a plain correlated Poisson grid.
    pub fn neutral() -> Self {
        Self {
            cells: Vec::new(),
            high_total_goals: usize::MAX,
            high_total_factor: 1.0,
        }
    }

    pub fn factor(&self, home: usize, away: usize) -> f64 {
        if let Some(c) = self.cells.iter().find(|c| c.home == home && c.away == away) {
            return c.factor;
        }
        if home.saturating_add(away) > self.high_total_goals {
            self.high_total_factor
        } else {
            1.0
        }
    }
}

impl EnsemblePolicy {
    pub fn weights(&self) -> [f64; 3] {
        [
            self.neutral_weight,
            self.conservative_weight,
            self.aggressive_weight,
        ]
    }
}

impl Calibration {
    pub fn validate(&self) -> Result<()> {
        if self.max_goals > MAX_GOALS_CAP {
            return Err(invalid(format!(
                "max_goals {} above cap {MAX_GOALS_CAP}",
                self.max_goals
            )));
        }
        if !self.rho.is_finite() || !(-1.0..=1.0).contains(&self.rho) {
            return Err(invalid(format!("rho {} outside [-1, 1]", self.rho)));
        }

        let weight_sum: f64 = self.form_weights.iter().sum();
        if self.form_weights.iter().any(|w| !w.is_finite() || *w < 0.0)
            || (weight_sum - 1.0).abs() > 1e-9
        {
            return Err(invalid(format!(
                "form weights must be non-negative and sum to 1 (got {weight_sum})"
            )));
        }

        let ensemble = self.ensemble.weights();
        let ensemble_sum: f64 = ensemble.iter().sum();
        if ensemble.iter().any(|w| !w.is_finite() || *w < 0.0) || (ensemble_sum - 1.0).abs() > 1e-9
        {
            return Err(invalid(format!(
                "ensemble weights must be non-negative and sum to 1 (got {ensemble_sum})"
            )));
        }

        for (label, (lo, hi)) in [
            ("home_rate_range", self.home_rate_range),
            ("away_rate_range", self.away_rate_range),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
                return Err(invalid(format!("{label} ({lo}, {hi}) is not a positive range")));
            }
        }

        let factors = self
            .cell_boosts
            .cells
            .iter()
            .chain(&self.ensemble.final_nudges)
            .map(|c| c.factor)
            .chain([
                self.cell_boosts.high_total_factor,
                self.tournament_home,
                self.tournament_away,
                self.ensemble.conservative_scale,
                self.ensemble.aggressive_home_cap,
                self.ensemble.aggressive_away_cap,
                self.ensemble.strength_floor,
                self.style.boost,
                self.style.penalty,
            ]);
        for factor in factors {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(invalid(format!("multiplier {factor} must be positive")));
            }
        }

        let coefficients = [
            self.form_sensitivity,
            self.defense_pivot,
            self.quality_home,
            self.quality_away,
            self.xg_ratio_floor,
            self.xg_ratio_blend,
            self.pressing_home,
            self.pressing_away,
            self.variance_damping,
            self.injury_damping,
        ];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(invalid("non-finite coefficient".to_string()));
        }
        if self.xg_ratio_floor <= 0.0 {
            return Err(invalid("xg_ratio_floor must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> EstimatorError {
    EstimatorError::InvalidCalibration(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Calibration::default().validate().unwrap();
    }

    #[test]
    fn explicit_cells_override_high_total_penalty() {
        let boosts = CellBoosts::default();
        assert_eq!(boosts.factor(0, 0), 1.32);
        assert_eq!(boosts.factor(2, 1), 1.08);
        assert_eq!(boosts.factor(1, 2), 1.0);
        assert_eq!(boosts.factor(3, 1), 1.0);
        assert_eq!(boosts.factor(3, 2), 0.75);
        assert_eq!(boosts.factor(6, 6), 0.75);
    }

    #[test]
    fn ensemble_weights_must_sum_to_one() {
        let mut cal = Calibration::default();
        cal.ensemble.aggressive_weight = 0.30;
        assert!(matches!(
            cal.validate(),
            Err(EstimatorError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn oversized_goal_bound_is_rejected() {
        let cal: Calibration = serde_json::from_str(r#"{"max_goals": 1000}"#).unwrap();
        assert!(matches!(
            cal.validate(),
            Err(EstimatorError::InvalidCalibration(_))
        ));

        let cal: Calibration =
            serde_json::from_str(r#"{"max_goals": 18446744073709551615}"#).unwrap();
        assert!(cal.validate().is_err());

        let mut cal = Calibration::default();
        cal.max_goals = MAX_GOALS_CAP;
        cal.validate().unwrap();
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let cal: Calibration = serde_json::from_str(r#"{"rho": -0.08, "max_goals": 8}"#).unwrap();
        assert_eq!(cal.rho, -0.08);
        assert_eq!(cal.max_goals, 8);
        assert_eq!(cal.tournament_home, 0.92);
        assert_eq!(cal.cell_boosts, CellBoosts::default());
    }
}
