use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::profile::missing::missing_fields;
use crate::profile::time_codec::seconds_to_display;

/// Canonical sex of a runner. Never carried as a raw string past normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    /// Wire code: `M`, `K` (kobieta), or nothing for `Unknown`.
    pub fn code(self) -> Option<&'static str> {
        match self {
            Sex::Male => Some("M"),
            Sex::Female => Some("K"),
            Sex::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != Sex::Unknown
    }
}

/// Names of the profile fields that may be reported as missing.
///
/// The elapsed 5 km time is called `t5k` on the wire; downstream consumers branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfileField {
    #[serde(rename = "sex")]
    Sex,
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "t5k")]
    Elapsed5k,
}

impl ProfileField {
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::Sex => "sex",
            ProfileField::Age => "age",
            ProfileField::Elapsed5k => "t5k",
        }
    }
}

/// A 5 km time held both as seconds and as its canonical `MM:SS` rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Elapsed5k {
    seconds: f64,
    display: String,
}

impl Elapsed5k {
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds,
            display: seconds_to_display(seconds),
        }
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

/// The result of one extraction. Immutable once built; `missing` is always derived
/// from the other three fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ProfileWire")]
pub struct RunnerProfile {
    sex: Sex,
    age: Option<i64>,
    elapsed_5k: Option<Elapsed5k>,
    missing: BTreeSet<ProfileField>,
}

impl RunnerProfile {
    pub fn new(sex: Sex, age: Option<i64>, elapsed_5k: Option<Elapsed5k>) -> Self {
        let missing = missing_fields(sex, age, elapsed_5k.as_ref());
        Self {
            sex,
            age,
            elapsed_5k,
            missing,
        }
    }

    /// The all-absent profile returned whenever extraction cannot proceed.
    pub fn absent() -> Self {
        Self::new(Sex::Unknown, None, None)
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn age(&self) -> Option<i64> {
        self.age
    }

    pub fn elapsed_5k(&self) -> Option<&Elapsed5k> {
        self.elapsed_5k.as_ref()
    }

    pub fn missing(&self) -> &BTreeSet<ProfileField> {
        &self.missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// JSON shape consumed by the application layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileWire {
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub t5k: Option<String>,
    pub t5k_s: Option<f64>,
    pub missing: Vec<ProfileField>,
}

impl From<RunnerProfile> for ProfileWire {
    fn from(profile: RunnerProfile) -> Self {
        Self {
            sex: profile.sex.code().map(String::from),
            age: profile.age,
            t5k: profile.elapsed_5k.as_ref().map(|e| e.display.clone()),
            t5k_s: profile.elapsed_5k.as_ref().map(|e| e.seconds),
            missing: profile.missing.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sex_codes() {
        assert_eq!(Sex::Male.code(), Some("M"));
        assert_eq!(Sex::Female.code(), Some("K"));
        assert_eq!(Sex::Unknown.code(), None);
        assert_eq!(Sex::default(), Sex::Unknown);
    }

    #[test]
    fn test_absent_profile_serializes_to_sentinel() {
        let value = serde_json::to_value(RunnerProfile::absent()).unwrap();
        assert_eq!(
            value,
            json!({
                "sex": null,
                "age": null,
                "t5k": null,
                "t5k_s": null,
                "missing": ["sex", "age", "t5k"]
            })
        );
    }

    #[test]
    fn test_complete_profile_serializes() {
        let profile = RunnerProfile::new(Sex::Female, Some(33), Some(Elapsed5k::from_seconds(1470.0)));
        assert!(profile.is_complete());
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["sex"], "K");
        assert_eq!(value["age"], 33);
        assert_eq!(value["t5k"], "24:30");
        assert_eq!(value["t5k_s"], 1470.0);
        assert_eq!(value["missing"], json!([]));
    }

    #[test]
    fn test_missing_is_ordered_sex_age_t5k() {
        let profile = RunnerProfile::new(Sex::Unknown, None, None);
        let names: Vec<_> = profile.missing().iter().map(|f| f.as_str()).collect();
        assert_eq!(names, ["sex", "age", "t5k"]);
    }

    #[test]
    fn test_elapsed_display_is_canonical() {
        let elapsed = Elapsed5k::from_seconds(1500.0);
        assert_eq!(elapsed.display(), "25:00");
        assert!((elapsed.seconds() - 1500.0).abs() < f64::EPSILON);
    }
}
