use serde::Serialize;
use tracing::debug;

use crate::calibration::Calibration;
use crate::error::{EstimatorError, Result};
use crate::profile::TeamProfile;
use crate::score_matrix::{BivariatePoisson, MatrixBuilder, ScoreMatrix};
use crate::strength::{self, ExpectedGoalsPair, RateBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Variant {
    Neutral,
    Conservative,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantRates {
    pub variant: Variant,
    pub rates: ExpectedGoalsPair,
    pub weight: f64,
}

/// The three rate pairs the ensemble blends, derived from the primary pair.
pub fn variant_rates(
    primary: ExpectedGoalsPair,
    home: &TeamProfile,
    away: &TeamProfile,
    cal: &Calibration,
) -> [VariantRates; 3] {
    let policy = &cal.ensemble;
    let [w_neutral, w_conservative, w_aggressive] = policy.weights();

    let strength_ratio = home.team_strength_index.max(policy.strength_floor)
        / away.team_strength_index.max(policy.strength_floor);
    let aggressive = primary.scaled(
        strength_ratio.min(policy.aggressive_home_cap),
        (1.0 / strength_ratio).min(policy.aggressive_away_cap),
    );

    [
        VariantRates {
            variant: Variant::Neutral,
            rates: primary,
            weight: w_neutral,
        },
        VariantRates {
            variant: Variant::Conservative,
            rates: primary.scaled(policy.conservative_scale, policy.conservative_scale),
            weight: w_conservative,
        },
        VariantRates {
            variant: Variant::Aggressive,
            rates: aggressive,
            weight: w_aggressive,
        },
    ]
}

/// Convex blend of matrices, renormalized. Inputs are untouched. Every part
/// must share the first part's goal bound.
pub fn combine(parts: &[(&ScoreMatrix, f64)]) -> Result<ScoreMatrix> {
    let max_goals = parts.first().map(|(m, _)| m.max_goals()).unwrap_or(0);
    let side = max_goals + 1;
    let mut cells = vec![0.0; side * side];
    for (matrix, weight) in parts {
        if matrix.max_goals() != max_goals {
            return Err(EstimatorError::GridMismatch {
                expected: max_goals,
                found: matrix.max_goals(),
            });
        }
        for (acc, p) in cells.iter_mut().zip(matrix.raw()) {
            *acc += p * weight;
        }
    }
    Ok(ScoreMatrix::from_weights(max_goals, cells))
}

pub fn ensemble(
    home: &TeamProfile,
    away: &TeamProfile,
    cal: &Calibration,
) -> Result<(ScoreMatrix, ExpectedGoalsPair)> {
    let (matrix, rates, _) = ensemble_with(&BivariatePoisson, home, away, cal)?;
    Ok((matrix, rates))
}

pub fn ensemble_with<B: MatrixBuilder + ?Sized>(
    builder: &B,
    home: &TeamProfile,
    away: &TeamProfile,
    cal: &Calibration,
) -> Result<(ScoreMatrix, ExpectedGoalsPair, RateBreakdown)> {
    let (primary, breakdown) = strength::derive_rates_detailed(home, away, cal);

    let variants = variant_rates(primary, home, away, cal);
    let matrices: Vec<ScoreMatrix> = variants
        .iter()
        .map(|v| {
            debug!(variant = ?v.variant, home = v.rates.home, away = v.rates.away, "building variant");
            builder.build(v.rates, cal.rho, cal.max_goals, &cal.cell_boosts)
        })
        .collect();

    let parts: Vec<(&ScoreMatrix, f64)> = matrices
        .iter()
        .zip(&variants)
        .map(|(m, v)| (m, v.weight))
        .collect();
    let blended = combine(&parts)?;

    let nudges = cal
        .ensemble
        .final_nudges
        .iter()
        .map(|c| (c.home, c.away, c.factor));
    let matrix = blended.reweighted(nudges);

    Ok((matrix, primary, breakdown))
}
