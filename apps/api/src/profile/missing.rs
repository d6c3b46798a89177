//! Missing-Field Inference.
//!
//! Computed only from normalized values. A `missing` list reported by the model is
//! never consulted: a field the model claims to have filled with garbage is still missing.

use std::collections::BTreeSet;

use crate::profile::models::{Elapsed5k, ProfileField, Sex};

pub fn missing_fields(
    sex: Sex,
    age: Option<i64>,
    elapsed_5k: Option<&Elapsed5k>,
) -> BTreeSet<ProfileField> {
    let mut missing = BTreeSet::new();
    if !sex.is_known() {
        missing.insert(ProfileField::Sex);
    }
    if age.is_none() {
        missing.insert(ProfileField::Age);
    }
    if elapsed_5k.is_none() {
        missing.insert(ProfileField::Elapsed5k);
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_missing() {
        let elapsed = Elapsed5k::from_seconds(1500.0);
        assert!(missing_fields(Sex::Male, Some(40), Some(&elapsed)).is_empty());
    }

    #[test]
    fn test_everything_missing() {
        let missing = missing_fields(Sex::Unknown, None, None);
        assert_eq!(
            missing,
            BTreeSet::from([ProfileField::Sex, ProfileField::Age, ProfileField::Elapsed5k])
        );
    }

    #[test]
    fn test_each_field_independently() {
        let elapsed = Elapsed5k::from_seconds(1500.0);

        let missing = missing_fields(Sex::Unknown, Some(40), Some(&elapsed));
        assert_eq!(missing, BTreeSet::from([ProfileField::Sex]));

        let missing = missing_fields(Sex::Female, None, Some(&elapsed));
        assert_eq!(missing, BTreeSet::from([ProfileField::Age]));

        let missing = missing_fields(Sex::Female, Some(0), None);
        assert_eq!(missing, BTreeSet::from([ProfileField::Elapsed5k]));
    }
}
