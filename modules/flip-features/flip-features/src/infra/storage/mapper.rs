use flip_features_sdk::FeatureFlag;

use super::entity;

impl From<entity::Model> for FeatureFlag {
    fn from(model: entity::Model) -> Self {
        Self {
            key: model.key,
            enabled: model.enabled,
            created_at: model.created_at.and_utc(),
            updated_at: model.updated_at.and_utc(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn model_timestamps_are_read_as_utc() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap();
        let updated = NaiveDate::from_ymd_opt(2024, 2, 3)
            .and_then(|d| d.and_hms_opt(4, 5, 6))
            .unwrap();

        let flag = FeatureFlag::from(entity::Model {
            key: "dark_mode".to_owned(),
            enabled: true,
            created_at: created,
            updated_at: updated,
        });

        assert_eq!(flag.key, "dark_mode");
        assert!(flag.enabled);
        assert_eq!(flag.created_at.naive_utc(), created);
        assert_eq!(flag.updated_at.naive_utc(), updated);
    }
}
