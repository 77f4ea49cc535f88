use std::sync::atomic::{AtomicUsize, Ordering};

use afcon_predictor::calibration::{Calibration, CellBoosts};
use afcon_predictor::prediction::Scoreline;
use afcon_predictor::score_matrix::{BivariatePoisson, MatrixBuilder, ScoreMatrix};
use afcon_predictor::strength::ExpectedGoalsPair;
use afcon_predictor::teams;
use afcon_predictor::{Estimator, EstimatorError};

#[derive(Default)]
struct CountingBuilder {
    calls: AtomicUsize,
}

impl MatrixBuilder for CountingBuilder {
    fn build(&self, rates: ExpectedGoalsPair, rho: f64, max_goals: usize, boosts: &CellBoosts) -> ScoreMatrix {
        self.calls.fetch_add(1, Ordering::SeqCst);
        BivariatePoisson.build(rates, rho, max_goals, boosts)
    }
}

fn estimator() -> Estimator {
    Estimator::new(teams::builtin_book().unwrap().clone(), Calibration::default()).unwrap()
}

#[test]
fn nigeria_tanzania_favours_the_stronger_home_side() {
    let p = estimator().predict("Nigeria", "Tanzania", 15).unwrap();

    assert!(p.rates.home > p.rates.away);
    assert!((p.rates.home - 1.313).abs() < 0.01, "home rate {}", p.rates.home);
    assert!((p.rates.away - 0.601).abs() < 0.01, "away rate {}", p.rates.away);

    let o = p.result.outcomes;
    assert!(o.home_win > o.away_win);
    assert!(o.home_win > 0.45 && o.home_win < 0.60, "home win {}", o.home_win);
    assert!((o.home_win + o.draw + o.away_win - 1.0).abs() < 1e-9);

    assert_eq!(p.result.most_likely, Scoreline { home: 1, away: 0 });
    assert!((p.result.confidence - 0.226).abs() < 0.01);
    assert_eq!(p.result.top_scores.len(), 15);
    assert_eq!(p.result.top_scores[0].score, p.result.most_likely);
}

#[test]
fn identical_profiles_only_differ_by_home_weighting() {
    let p = estimator().predict("Congo DR", "Congo DR", 5).unwrap();
    let o = p.result.outcomes;
    assert!((o.home_win - o.away_win).abs() < 0.06, "{o:?}");
    assert!(o.draw > 0.0);
}

#[test]
fn repeated_predictions_are_identical() {
    let est = estimator();
    let first = est.predict("Senegal", "Botswana", 10).unwrap();
    let second = est.predict("Senegal", "Botswana", 10).unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(first.matrix, second.matrix);
}

#[test]
fn unknown_team_fails_before_any_matrix_is_built() {
    let est = Estimator::with_builder(
        teams::builtin_book().unwrap().clone(),
        Calibration::default(),
        CountingBuilder::default(),
    )
    .unwrap();

    let err = est.predict("Atlantis", "Benin", 5).unwrap_err();
    match err {
        EstimatorError::UnknownTeam { name, available } => {
            assert_eq!(name, "Atlantis");
            assert!(available.contains(&"Benin".to_string()));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(est.predict("Benin", "Atlantis", 5).is_err());
    assert_eq!(est.builder().calls.load(Ordering::SeqCst), 0);

    est.predict("Benin", "Nigeria", 5).unwrap();
    assert_eq!(est.builder().calls.load(Ordering::SeqCst), 3);
}

#[test]
fn single_cell_grid_is_certain() {
    let mut cal = Calibration::default();
    cal.max_goals = 0;
    let est = Estimator::new(teams::builtin_book().unwrap().clone(), cal).unwrap();
    let p = est.predict("Nigeria", "Tanzania", 15).unwrap();

    assert_eq!(p.matrix.side(), 1);
    assert!((p.matrix.get(0, 0) - 1.0).abs() < 1e-12);
    assert_eq!(p.result.most_likely, Scoreline { home: 0, away: 0 });
    assert!((p.result.outcomes.draw - 1.0).abs() < 1e-12);
    assert_eq!(p.result.top_scores.len(), 1);
}

#[test]
fn calibration_changes_flow_through() {
    let mut cal = Calibration::default();
    cal.max_goals = 10;
    let est = Estimator::new(teams::builtin_book().unwrap().clone(), cal).unwrap();
    let p = est.predict("Congo DR", "Benin", 3).unwrap();
    assert_eq!(p.matrix.side(), 11);
    assert!((p.matrix.total() - 1.0).abs() < 1e-9);
}

#[test]
fn unbounded_goal_grid_is_refused_at_construction() {
    let cal: Calibration = serde_json::from_str(r#"{"max_goals": 18446744073709551615}"#).unwrap();
    let err = Estimator::new(teams::builtin_book().unwrap().clone(), cal)
        .err()
        .unwrap();
    assert!(matches!(err, EstimatorError::InvalidCalibration(_)), "{err:?}");
}

/// Widens the grid after the first variant.
#[derive(Default)]
struct DriftingBuilder {
    calls: AtomicUsize,
}

impl MatrixBuilder for DriftingBuilder {
    fn build(&self, rates: ExpectedGoalsPair, rho: f64, max_goals: usize, boosts: &CellBoosts) -> ScoreMatrix {
        let extra = self.calls.fetch_add(1, Ordering::SeqCst).min(1);
        BivariatePoisson.build(rates, rho, max_goals + extra, boosts)
    }
}

#[test]
fn inconsistent_builder_grids_are_reported() {
    let est = Estimator::with_builder(
        teams::builtin_book().unwrap().clone(),
        Calibration::default(),
        DriftingBuilder::default(),
    )
    .unwrap();
    let err = est.predict("Nigeria", "Tanzania", 5).unwrap_err();
    assert_eq!(err, EstimatorError::GridMismatch { expected: 6, found: 7 });
}
