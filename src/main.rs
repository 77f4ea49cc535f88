use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use afcon_predictor::config::RunConfig;
use afcon_predictor::display::render_prediction;
use afcon_predictor::report::{self, PredictionReport};
use afcon_predictor::{Estimator, Prediction, export};

fn main() -> Result<()> {
    let mut cfg = RunConfig::from_env();
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    cfg.apply_args(&args)?;

    let book = cfg.load_book()?;
    let calibration = cfg.load_calibration()?;
    info!(
        teams = book.len(),
        max_goals = calibration.max_goals,
        rho = calibration.rho,
        "profiles loaded"
    );
    let estimator = Estimator::new(book, calibration).context("build estimator")?;

    let mut predictions: Vec<Prediction> = Vec::new();
    for (home, away) in cfg.fixtures_or_default() {
        let prediction = estimator
            .predict(&home, &away, cfg.top_n)
            .with_context(|| format!("predict {home} vs {away}"))?;
        println!("{}", render_prediction(&prediction, estimator.calibration()));
        predictions.push(prediction);
    }

    if let Some(path) = &cfg.report_path {
        report::write_report(path, &PredictionReport::new(&predictions, estimator.calibration()))?;
        info!(path = %path.display(), matches = predictions.len(), "predictions saved");
    }

    if let Some(path) = &cfg.xlsx_path {
        match export::export_predictions(path, &predictions) {
            Ok(summary) => info!(
                path = %path.display(),
                fixtures = summary.fixtures,
                grids = summary.grid_sheets,
                "workbook written"
            ),
            Err(err) => warn!("workbook export failed: {err:#}"),
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,afcon_predictor=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
