use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use afcon_predictor::{Estimator, EstimatorError};
use afcon_predictor::config::RunConfig;
use afcon_predictor::prediction::OutcomeProbs;

#[derive(Debug, Clone, Default)]
struct Standing {
    played: usize,
    expected_points: f64,
    expected_goals_for: f64,
    expected_goals_against: f64,
}

fn main() -> Result<()> {
    let mut cfg = RunConfig::from_env();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,afcon_predictor=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    cfg.apply_args(&args)?;

    let book = cfg.load_book()?;
    if book.len() < 2 {
        return Err(anyhow!("round robin needs at least two teams, got {}", book.len()));
    }
    let estimator = Estimator::new(book, cfg.load_calibration()?)?;

    let names = estimator.book().names();
    let fixtures: Vec<(&str, &str)> = names
        .iter()
        .flat_map(|home| {
            names
                .iter()
                .filter(move |away| *away != home)
                .map(move |away| (home.as_str(), away.as_str()))
        })
        .collect();

    let pool = cfg.threads.and_then(|threads| {
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => Some(pool),
            Err(err) => {
                warn!(threads, "thread pool unavailable, using the global pool: {err}");
                None
            }
        }
    });
    let run = || {
        fixtures
            .par_iter()
            .map(|(home, away)| -> Result<_, EstimatorError> {
                let p = estimator.predict(home, away, 1)?;
                Ok((p.label(), p.rates, p.result.outcomes))
            })
            .collect::<Result<Vec<_>, EstimatorError>>()
    };
    let rows = match pool.as_ref() {
        Some(pool) => pool.install(run)?,
        None => run()?,
    };
    info!(fixtures = rows.len(), teams = names.len(), "round robin evaluated");

    let mut table: BTreeMap<&str, Standing> = BTreeMap::new();
    println!("{:<32} {:>8} {:>8} {:>8} {:>7} {:>7}", "Fixture", "Home %", "Draw %", "Away %", "xG H", "xG A");
    for ((home, away), (label, rates, outcomes)) in fixtures.iter().zip(&rows) {
        println!(
            "{:<32} {:>8.2} {:>8.2} {:>8.2} {:>7.2} {:>7.2}",
            label,
            outcomes.home_win * 100.0,
            outcomes.draw * 100.0,
            outcomes.away_win * 100.0,
            rates.home,
            rates.away
        );
        let (home_pts, away_pts) = expected_points(outcomes);
        let h = table.entry(*home).or_default();
        h.played += 1;
        h.expected_points += home_pts;
        h.expected_goals_for += rates.home;
        h.expected_goals_against += rates.away;
        let a = table.entry(*away).or_default();
        a.played += 1;
        a.expected_points += away_pts;
        a.expected_goals_for += rates.away;
        a.expected_goals_against += rates.home;
    }

    let mut standings: Vec<(&str, Standing)> = table.into_iter().collect();
    standings.sort_by(|a, b| {
        b.1.expected_points
            .total_cmp(&a.1.expected_points)
            .then_with(|| a.0.cmp(b.0))
    });

    println!();
    println!("{:<4} {:<20} {:>4} {:>8} {:>8} {:>8}", "#", "Team", "P", "xPts", "xGF", "xGA");
    for (idx, (team, s)) in standings.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>4} {:>8.2} {:>8.2} {:>8.2}",
            idx + 1,
            team,
            s.played,
            s.expected_points,
            s.expected_goals_for,
            s.expected_goals_against
        );
    }
    Ok(())
}

fn expected_points(o: &OutcomeProbs) -> (f64, f64) {
    (3.0 * o.home_win + o.draw, 3.0 * o.away_win + o.draw)
}
