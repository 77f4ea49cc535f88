use serde::Serialize;
use tracing::debug;

use crate::calibration::Calibration;
use crate::ensemble;
use crate::error::Result;
use crate::profile::{ProfileBook, TeamProfile};
use crate::prediction::PredictionResult;
use crate::score_matrix::{BivariatePoisson, MatrixBuilder, ScoreMatrix};
use crate::strength::{ExpectedGoalsPair, RateBreakdown};

/// Everything produced for one fixture.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub home: TeamProfile,
    pub away: TeamProfile,
    pub rates: ExpectedGoalsPair,
    pub breakdown: RateBreakdown,
    pub matrix: ScoreMatrix,
    pub result: PredictionResult,
}

impl Prediction {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }
}

pub struct Estimator<B = BivariatePoisson> {
    book: ProfileBook,
    calibration: Calibration,
    builder: B,
}

impl Estimator<BivariatePoisson> {
    pub fn new(book: ProfileBook, calibration: Calibration) -> Result<Self> {
        Self::with_builder(book, calibration, BivariatePoisson)
    }
}

impl<B: MatrixBuilder> Estimator<B> {
    pub fn with_builder(book: ProfileBook, calibration: Calibration, builder: B) -> Result<Self> {
        calibration.validate()?;
        Ok(Self {
            book,
            calibration,
            builder,
        })
    }

    pub fn book(&self) -> &ProfileBook {
        &self.book
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Both names are resolved before any matrix work starts.
    pub fn predict(&self, home: &str, away: &str, top_n: usize) -> Result<Prediction> {
        let home = self.book.get(home)?;
        let away = self.book.get(away)?;
        self.predict_profiles(home, away, top_n)
    }

    pub fn predict_profiles(
        &self,
        home: &TeamProfile,
        away: &TeamProfile,
        top_n: usize,
    ) -> Result<Prediction> {
        let (matrix, rates, breakdown) =
            ensemble::ensemble_with(&self.builder, home, away, &self.calibration)?;
        let result = PredictionResult::from_matrix(&matrix, top_n);
        debug!(
            home = %home.name,
            away = %away.name,
            score = %result.most_likely,
            confidence = result.confidence,
            "prediction ready"
        );
        Ok(Prediction {
            home: home.clone(),
            away: away.clone(),
            rates,
            breakdown,
            matrix,
            result,
        })
    }
}
