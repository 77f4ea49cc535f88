/// Probability that side A beats side B under the Elo logistic curve.
pub fn expected_score(r_a: f64, r_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf(-(r_a - r_b) / 400.0))
}

/// Elo expectation re-centred onto [-1, 1]; 0 means evenly matched.
pub fn quality_factor(r_home: f64, r_away: f64) -> f64 {
    (expected_score(r_home, r_away) - 0.5) * 2.0
}
