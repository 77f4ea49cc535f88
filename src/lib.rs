pub mod calibration;
pub mod config;
pub mod display;
pub mod elo;
pub mod ensemble;
pub mod error;
pub mod estimator;
pub mod export;
pub mod metrics;
pub mod prediction;
pub mod profile;
pub mod report;
pub mod score_matrix;
pub mod strength;
pub mod teams;

pub use error::EstimatorError;
pub use estimator::{Estimator, Prediction};
