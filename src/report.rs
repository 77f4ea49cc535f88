use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::estimator::Prediction;
use crate::metrics::TeamMetrics;
use crate::profile::TeamProfile;

pub const MODEL_NAME: &str = "AFCON 2025 Ensemble Predictor";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub matches: Vec<PredictionRecord>,
    pub model_info: ModelInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "match")]
    pub label: String,
    pub predicted_score: String,
    pub confidence: f64,
    pub expected_goals: SidePair,
    pub outcomes: OutcomePct,
    pub markets: MarketPct,
    pub top_scores: Vec<ScoreRow>,
    pub team_data: TeamPair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidePair {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomePct {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPct {
    pub home_clean_sheet: f64,
    pub away_clean_sheet: f64,
    pub over_1_5: f64,
    pub over_2_5: f64,
    pub both_teams_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRow {
    pub score: String,
    pub probability: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPair {
    pub home: TeamCard,
    pub away: TeamCard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamCard {
    pub team: String,
    pub coach: String,
    pub key_player: String,
    pub style: String,
    pub metrics: TeamMetrics,
}

impl TeamCard {
    pub fn new(p: &TeamProfile, cal: &Calibration) -> Self {
        Self {
            team: p.name.clone(),
            coach: p.coach.clone(),
            key_player: p.key_player.clone(),
            style: p.style.clone(),
            metrics: TeamMetrics::derive(p, cal),
        }
    }
}

impl PredictionRecord {
    pub fn new(p: &Prediction, cal: &Calibration) -> Self {
        let r = &p.result;
        Self {
            label: p.label(),
            predicted_score: r.most_likely.to_string(),
            confidence: pct(r.confidence),
            expected_goals: SidePair {
                home: round2(p.rates.home),
                away: round2(p.rates.away),
            },
            outcomes: OutcomePct {
                home_win: pct(r.outcomes.home_win),
                draw: pct(r.outcomes.draw),
                away_win: pct(r.outcomes.away_win),
            },
            markets: MarketPct {
                home_clean_sheet: pct(r.markets.home_clean_sheet),
                away_clean_sheet: pct(r.markets.away_clean_sheet),
                over_1_5: pct(r.markets.over_1_5),
                over_2_5: pct(r.markets.over_2_5),
                both_teams_score: pct(r.markets.both_teams_score),
            },
            top_scores: r
                .top_scores
                .iter()
                .map(|s| ScoreRow {
                    score: s.score.to_string(),
                    probability: pct(s.probability),
                    cumulative: pct(s.cumulative),
                })
                .collect(),
            team_data: TeamPair {
                home: TeamCard::new(&p.home, cal),
                away: TeamCard::new(&p.away, cal),
            },
        }
    }
}

impl PredictionReport {
    pub fn new(predictions: &[Prediction], cal: &Calibration) -> Self {
        Self {
            matches: predictions
                .iter()
                .map(|p| PredictionRecord::new(p, cal))
                .collect(),
            model_info: ModelInfo {
                name: MODEL_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }
}

pub fn write_report(path: &Path, report: &PredictionReport) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create report dir {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(report).context("serialize prediction report")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap report into {}", path.display()))?;
    Ok(())
}

pub fn load_report(path: &Path) -> Result<PredictionReport> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn pct(p: f64) -> f64 {
    round2(p * 100.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(pct(0.123456), 12.35);
        assert_eq!(round2(1.31294), 1.31);
    }
}
