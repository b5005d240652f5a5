#![cfg(feature = "db-sqlite")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Feature flag rows on top of the applied schema.

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::{exec, ready_store};
use flip_features::FeatureFlagsError;
use sea_orm::ConnectionTrait;

#[tokio::test]
async fn omitted_enabled_defaults_to_false() {
    let features = ready_store().await;
    exec(
        features.conn(),
        r#"INSERT INTO "flip_features" ("key", "created_at", "updated_at")
           VALUES ('dark_mode', '2024-01-01 00:00:00', '2024-01-02 00:00:00')"#,
    )
    .await;

    let flag = features
        .api()
        .get("dark_mode")
        .await
        .unwrap()
        .expect("row must exist");

    let created = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let updated = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(flag.key, "dark_mode");
    assert!(!flag.enabled);
    assert_eq!(flag.created_at, Utc.from_utc_datetime(&created));
    assert_eq!(flag.updated_at, Utc.from_utc_datetime(&updated));
}

#[tokio::test]
async fn null_key_is_rejected_by_the_store() {
    let features = ready_store().await;
    let result = features
        .conn()
        .execute(sea_orm::Statement::from_string(
            features.conn().get_database_backend(),
            r#"INSERT INTO "flip_features" ("key", "enabled", "created_at", "updated_at")
               VALUES (NULL, 1, '2024-01-01 00:00:00', '2024-01-01 00:00:00')"#,
        ))
        .await;
    assert!(result.is_err(), "key must be NOT NULL");
}

#[tokio::test]
async fn register_creates_disabled_flag() {
    let features = ready_store().await;
    let api = features.api();

    let flag = api.register("new_checkout").await.unwrap();
    assert_eq!(flag.key, "new_checkout");
    assert!(!flag.enabled);
    assert_eq!(api.status("new_checkout").await.unwrap(), Some(false));

    // registering again hands back the same row
    let again = api.register("new_checkout").await.unwrap();
    assert_eq!(again, flag);
    assert_eq!(api.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn switch_toggles_and_keeps_created_at() {
    let features = ready_store().await;
    let api = features.api();

    let registered = api.register("beta_search").await.unwrap();
    let on = api.switch("beta_search", true).await.unwrap();
    assert!(on.enabled);
    assert_eq!(on.created_at, registered.created_at);
    assert!(on.updated_at >= registered.updated_at);
    assert!(api.is_enabled("beta_search").await.unwrap());

    let off = api.switch("beta_search", false).await.unwrap();
    assert!(!off.enabled);
    assert!(!api.is_enabled("beta_search").await.unwrap());
}

#[tokio::test]
async fn switch_creates_missing_flag() {
    let features = ready_store().await;
    let api = features.api();

    let flag = api.switch("instant_on", true).await.unwrap();
    assert!(flag.enabled);
    assert_eq!(api.status("instant_on").await.unwrap(), Some(true));
}

#[tokio::test]
async fn unknown_flag_is_disabled() {
    let features = ready_store().await;
    let api = features.api();

    assert_eq!(api.status("nope").await.unwrap(), None);
    assert!(api.get("nope").await.unwrap().is_none());
    assert!(!api.is_enabled("nope").await.unwrap());
}

#[tokio::test]
async fn list_is_ordered_by_key() {
    let features = ready_store().await;
    let api = features.api();

    for key in ["zeta", "alpha", "mid"] {
        api.register(key).await.unwrap();
    }

    let keys: Vec<String> = api.list().await.unwrap().into_iter().map(|f| f.key).collect();
    assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
}

#[tokio::test]
async fn invalid_keys_are_rejected() {
    let features = ready_store().await;
    let api = features.api();

    for key in ["", "   ", " padded", &"k".repeat(256)] {
        let err = api.register(key).await.unwrap_err();
        assert!(
            matches!(err, FeatureFlagsError::InvalidKey { .. }),
            "key {key:?} gave {err:?}"
        );
    }
    assert!(api.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_table_surfaces_as_internal_error() {
    let features = common::fresh_store(flip_features::config::SchemaVersioning::Tracked).await;

    let err = features.api().list().await.unwrap_err();
    assert!(matches!(err, FeatureFlagsError::Internal), "got {err:?}");
}
