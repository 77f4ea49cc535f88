use std::cmp::Ordering;

use serde::Serialize;

use crate::score_matrix::ScoreMatrix;

pub const DEFAULT_TOP_N: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Scoreline {
    pub home: usize,
    pub away: usize,
}

impl std::fmt::Display for Scoreline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedScore {
    pub score: Scoreline,
    pub probability: f64,
    pub cumulative: f64,
    /// Roughly how many matches per occurrence; 999 when impossible.
    pub one_in: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeProbs {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketLines {
    /// Home keeps a clean sheet (away scores nothing).
    pub home_clean_sheet: f64,
    pub away_clean_sheet: f64,
    pub over_1_5: f64,
    pub over_2_5: f64,
    pub both_teams_score: f64,
}

/// Read-only summary of a score matrix. All probabilities are fractions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub most_likely: Scoreline,
    pub confidence: f64,
    pub outcomes: OutcomeProbs,
    pub markets: MarketLines,
    pub top_scores: Vec<RankedScore>,
}

impl PredictionResult {
    pub fn from_matrix(matrix: &ScoreMatrix, top_n: usize) -> Self {
        let mut home_win = 0.0;
        let mut draw = 0.0;
        let mut away_win = 0.0;
        let mut over_1_5 = 0.0;
        let mut over_2_5 = 0.0;
        let mut best = (Scoreline { home: 0, away: 0 }, f64::NEG_INFINITY);

        for (h, a, p) in matrix.cells() {
            match h.cmp(&a) {
                Ordering::Greater => home_win += p,
                Ordering::Equal => draw += p,
                Ordering::Less => away_win += p,
            }
            if h + a >= 2 {
                over_1_5 += p;
            }
            if h + a >= 3 {
                over_2_5 += p;
            }
            // Strict comparison keeps the first maximum in row-major order.
            if p > best.1 {
                best = (Scoreline { home: h, away: a }, p);
            }
        }

        let home_clean_sheet = matrix.away_goals_marginal(0);
        let away_clean_sheet = matrix.home_goals_marginal(0);
        let both_teams_score = 1.0 - home_clean_sheet - away_clean_sheet + matrix.get(0, 0);

        Self {
            most_likely: best.0,
            confidence: best.1.max(0.0),
            outcomes: OutcomeProbs {
                home_win,
                draw,
                away_win,
            },
            markets: MarketLines {
                home_clean_sheet,
                away_clean_sheet,
                over_1_5,
                over_2_5,
                both_teams_score: both_teams_score.clamp(0.0, 1.0),
            },
            top_scores: rank_scores(matrix, top_n),
        }
    }
}

pub fn rank_scores(matrix: &ScoreMatrix, top_n: usize) -> Vec<RankedScore> {
    let mut cells: Vec<(usize, usize, f64)> = matrix.cells().collect();
    cells.sort_by(|x, y| y.2.partial_cmp(&x.2).unwrap_or(Ordering::Equal));

    let mut cumulative = 0.0;
    cells
        .into_iter()
        .take(top_n)
        .map(|(home, away, probability)| {
            cumulative += probability;
            RankedScore {
                score: Scoreline { home, away },
                probability,
                cumulative,
                one_in: one_in(probability),
            }
        })
        .collect()
}

fn one_in(p: f64) -> u32 {
    if p > 0.0 {
        (1.0 / p).floor().min(u32::MAX as f64) as u32
    } else {
        999
    }
}
