//! Prediction input validation — the bounds the regression was trained on.
//!
//! The extraction core only reports presence/absence; this is where ranges are enforced.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::errors::AppError;
use crate::profile::models::{RunnerProfile, Sex};
use crate::profile::time_codec::display_to_seconds;

pub const MIN_AGE: i64 = 10;
pub const MAX_AGE: i64 = 90;
/// 12:00
pub const MIN_T5K_SECONDS: f64 = 12.0 * 60.0;
/// 60:00
pub const MAX_T5K_SECONDS: f64 = 60.0 * 60.0;

/// Body of `POST /api/v1/predict`. Fields stay loosely typed so every problem
/// gets a readable validation message instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub sex: Value,
    #[serde(default)]
    pub age: Value,
    #[serde(default)]
    pub t5k: Value,
    #[serde(default)]
    pub t5k_s: Value,
}

/// A complete, in-range set of regression inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInput {
    #[serde(serialize_with = "serialize_sex")]
    pub sex: Sex,
    pub age: i64,
    pub t5k_s: f64,
}

impl PredictionInput {
    pub fn new(sex: Sex, age: i64, t5k_s: f64) -> Result<Self, AppError> {
        if !sex.is_known() {
            return Err(AppError::Validation("sex must be 'M' or 'K'".to_string()));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(AppError::Validation(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}"
            )));
        }
        if !(MIN_T5K_SECONDS..=MAX_T5K_SECONDS).contains(&t5k_s) {
            return Err(AppError::Validation(
                "5 km time must be between 12:00 and 60:00".to_string(),
            ));
        }
        Ok(Self { sex, age, t5k_s })
    }

    /// Strict parsing of a hand-filled form: `sex` is `M`/`K`, `age` an integer
    /// (fractional numbers truncate),
    /// time from `t5k_s` seconds or else a `t5k` time string.
    pub fn from_request(request: &PredictRequest) -> Result<Self, AppError> {
        if is_blank(&request.sex) {
            return Err(AppError::Validation("Missing field: sex (M/K)".to_string()));
        }
        if is_blank(&request.age) {
            return Err(AppError::Validation("Missing field: age".to_string()));
        }
        if is_blank(&request.t5k_s) && is_blank(&request.t5k) {
            return Err(AppError::Validation(
                "Missing 5 km time: provide t5k_s (seconds) or t5k such as '25:00'".to_string(),
            ));
        }

        let sex = match request.sex.as_str().map(|s| s.trim().to_ascii_uppercase()) {
            Some(code) if code == "M" => Sex::Male,
            Some(code) if code == "K" => Sex::Female,
            _ => return Err(AppError::Validation("sex must be 'M' or 'K'".to_string())),
        };

        let age = parse_age(&request.age)
            .ok_or_else(|| AppError::Validation("age must be an integer".to_string()))?;

        let t5k_s = if is_blank(&request.t5k_s) {
            request.t5k.as_str().and_then(display_to_seconds)
        } else {
            parse_seconds(&request.t5k_s)
        }
        .ok_or_else(|| {
            AppError::Validation(
                "Invalid 5 km time: use t5k_s (seconds) or t5k such as '25:00'".to_string(),
            )
        })?;

        Self::new(sex, age, t5k_s)
    }

    /// Requires a fully present extracted profile, then applies the same bounds.
    pub fn from_profile(profile: &RunnerProfile) -> Result<Self, AppError> {
        let (Some(age), Some(elapsed)) = (profile.age(), profile.elapsed_5k()) else {
            return Err(AppError::IncompleteProfile(Box::new(profile.clone())));
        };
        if !profile.sex().is_known() {
            return Err(AppError::IncompleteProfile(Box::new(profile.clone())));
        }
        Self::new(profile.sex(), age, elapsed.seconds())
    }
}

fn serialize_sex<S: Serializer>(sex: &Sex, serializer: S) -> Result<S::Ok, S::Error> {
    sex.code().serialize(serializer)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Numbers are truncated toward zero; strings must hold an integer.
fn parse_age(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_seconds(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    seconds.is_finite().then_some(seconds)
}
