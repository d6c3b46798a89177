//! Half-marathon time prediction.
//!
//! `Predictor` is the seam: handlers only see the trait, `AppState` carries an
//! `Arc<dyn Predictor>`. The shipped backend is a linear regression over
//! `[t5k_s, age, sex_M]` whose coefficients live in a local JSON file.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::prediction::validation::PredictionInput;
use crate::profile::models::Sex;
use crate::profile::time_codec::seconds_to_hhmmss;

pub trait Predictor: Send + Sync {
    /// Predicted half-marathon time in seconds.
    fn predict(&self, input: &PredictionInput) -> f64;
}

/// Linear regression coefficients, e.g.
/// `{"intercept": 120.0, "coefficients": {"t5k_s": 4.4, "age": 6.2, "sex_M": -35.0}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Coefficients,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Coefficients {
    pub t5k_s: f64,
    pub age: f64,
    #[serde(rename = "sex_M")]
    pub sex_m: f64,
}

impl LinearModel {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prediction model '{}'", path.display()))?;
        let model: LinearModel = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid prediction model JSON in '{}'", path.display()))?;

        let c = &model.coefficients;
        ensure!(
            [model.intercept, c.t5k_s, c.age, c.sex_m]
                .iter()
                .all(|v| v.is_finite()),
            "Prediction model '{}' contains non-finite coefficients",
            path.display()
        );

        Ok(model)
    }
}

impl Predictor for LinearModel {
    fn predict(&self, input: &PredictionInput) -> f64 {
        let sex_m = if input.sex == Sex::Male { 1.0 } else { 0.0 };
        self.intercept
            + self.coefficients.t5k_s * input.t5k_s
            + self.coefficients.age * input.age as f64
            + self.coefficients.sex_m * sex_m
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub t21k_s: f64,
    pub t21k_hhmmss: String,
}

/// Runs the predictor and packages the result for the API.
pub fn predict_half_marathon(
    predictor: &dyn Predictor,
    input: &PredictionInput,
) -> Result<Prediction, AppError> {
    let t21k_s = predictor.predict(input);
    if !t21k_s.is_finite() || t21k_s < 0.0 {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Predictor returned an unusable value: {t21k_s}"
        )));
    }
    Ok(Prediction {
        t21k_s,
        t21k_hhmmss: seconds_to_hhmmss(t21k_s),
    })
}
