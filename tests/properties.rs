use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use afcon_predictor::calibration::{Calibration, CellBoosts};
use afcon_predictor::ensemble::{combine, ensemble};
use afcon_predictor::prediction::PredictionResult;
use afcon_predictor::score_matrix::{build_matrix, build_matrix_with};
use afcon_predictor::strength::{ExpectedGoalsPair, derive_rates};
use afcon_predictor::teams;

const SEED: u64 = 0x00af_c025;

fn random_rates(rng: &mut StdRng) -> ExpectedGoalsPair {
    ExpectedGoalsPair::new(rng.gen_range(0.25..=3.2), rng.gen_range(0.20..=2.8))
}

#[test]
fn matrices_are_normalized_and_non_negative() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..200 {
        let rates = random_rates(&mut rng);
        let rho = rng.gen_range(-0.3..=0.1);
        let max_goals = rng.gen_range(0..=12);
        let m = build_matrix(rates, rho, max_goals);
        assert!((m.total() - 1.0).abs() < 1e-9, "{rates:?} rho {rho} n {max_goals}");
        assert!(m.cells().all(|(_, _, p)| p >= 0.0 && p.is_finite()));

        let r = PredictionResult::from_matrix(&m, 15);
        let o = r.outcomes;
        assert!((o.home_win + o.draw + o.away_win - 1.0).abs() < 1e-9);
        assert!(r.markets.over_2_5 <= r.markets.over_1_5 + 1e-12);
        assert!(r.top_scores.windows(2).all(|w| w[0].probability >= w[1].probability));
    }
}

#[test]
fn scoring_chance_strictly_grows_with_the_home_rate() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 1);
    for _ in 0..25 {
        let away = rng.gen_range(0.20..=2.8);
        let mut previous = 0.0;
        for step in 0..=59 {
            let home = 0.25 + step as f64 * 0.05;
            let m = build_matrix(ExpectedGoalsPair::new(home, away), -0.15, 6);
            let scores = 1.0 - m.home_goals_marginal(0);
            assert!(scores > previous, "home {home} away {away}: {scores} <= {previous}");
            previous = scores;
        }
    }
}

#[test]
fn scoring_chance_strictly_grows_with_the_away_rate() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 3);
    for _ in 0..25 {
        let home = rng.gen_range(0.25..=3.2);
        let mut previous = 0.0;
        for step in 0..=52 {
            let away = 0.20 + step as f64 * 0.05;
            let m = build_matrix(ExpectedGoalsPair::new(home, away), -0.15, 6);
            let scores = 1.0 - m.away_goals_marginal(0);
            assert!(scores > previous, "home {home} away {away}: {scores} <= {previous}");
            previous = scores;
        }
    }
}

#[test]
fn zero_correlation_without_boosts_is_independent_poisson() {
    let rates = ExpectedGoalsPair::new(1.4, 0.9);
    let m = build_matrix_with(rates, 0.0, 10, &CellBoosts::neutral());
    let p00 = (-rates.home).exp() * (-rates.away).exp();
    let p21 = p00 * rates.home.powi(2) / 2.0 * rates.away;
    let mass: f64 = (0..=10)
        .flat_map(|h| (0..=10).map(move |a| (h, a)))
        .map(|(h, a)| poisson(rates.home, h) * poisson(rates.away, a))
        .sum();
    assert!((m.get(0, 0) - p00 / mass).abs() < 1e-12);
    assert!((m.get(2, 1) - p21 / mass).abs() < 1e-12);
}

#[test]
fn blending_order_does_not_matter() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 2);
    let parts: Vec<_> = (0..3)
        .map(|_| build_matrix(random_rates(&mut rng), -0.15, 6))
        .collect();
    let forward = combine(&[(&parts[0], 0.55), (&parts[1], 0.25), (&parts[2], 0.20)]).unwrap();
    let shuffled = combine(&[(&parts[2], 0.20), (&parts[0], 0.55), (&parts[1], 0.25)]).unwrap();
    for ((_, _, x), (_, _, y)) in forward.cells().zip(shuffled.cells()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn every_builtin_fixture_stays_in_range() {
    let cal = Calibration::default();
    let book = teams::builtin_book().unwrap();
    for home in book.profiles() {
        for away in book.profiles() {
            let rates = derive_rates(home, away, &cal);
            assert!((0.25..=3.2).contains(&rates.home), "{} {rates:?}", home.name);
            assert!((0.20..=2.8).contains(&rates.away), "{} {rates:?}", away.name);

            let (m, primary) = ensemble(home, away, &cal).unwrap();
            assert_eq!(primary, rates);
            assert!((m.total() - 1.0).abs() < 1e-9);
        }
    }
}

fn poisson(lambda: f64, k: usize) -> f64 {
    let fact: f64 = (1..=k).map(|i| i as f64).product();
    (-lambda).exp() * lambda.powi(k as i32) / fact
}
