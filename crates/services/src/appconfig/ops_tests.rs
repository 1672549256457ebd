#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::appconfig::{AppConfigEngine, ResourceGroup};
use rstest::rstest;
use std::sync::Arc;
use vendorless_store::SimStore;

fn kv(key: &str, value: &str, label: Option<&str>, locked: bool) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: value.to_string(),
        label: label.map(str::to_string),
        content_type: None,
        etag: "etag-0".to_string(),
        last_modified: "2024-01-01T00:00:00Z".to_string(),
        locked,
    }
}

fn engine() -> AppConfigEngine {
    let state = AppConfigState {
        subscriptions: vec![Subscription {
            subscription_id: "sub-test-alpha".to_string(),
            display_name: "Alpha Test Subscription".to_string(),
            resource_groups: vec![ResourceGroup {
                name: "rg-one".to_string(),
                app_config_stores: vec![AppConfigStore {
                    name: "appconfig-store-charlie".to_string(),
                    id: "/subscriptions/sub-test-alpha/stores/charlie".to_string(),
                    location: "eastus".to_string(),
                    key_values: vec![
                        kv("AppName", "Demo", None, false),
                        kv("AppName", "DemoProd", Some("Prod"), false),
                        kv("LockedKey1", "sealed", None, true),
                    ],
                }],
            }],
        }],
    };
    AppConfigEngine::new(Arc::new(SimStore::new(state)))
}

#[test]
fn test_account_list() {
    let stores = engine().account_list("sub-test-alpha").unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].name, "appconfig-store-charlie");
    assert_eq!(stores[0].location, "eastus");
}

#[test]
fn test_account_list_by_display_name() {
    let stores = engine().account_list("Alpha Test Subscription").unwrap();
    assert_eq!(stores.len(), 1);
}

#[test]
fn test_account_list_blank_subscription() {
    let err = engine().account_list("  ").unwrap_err();
    assert_eq!(
        err,
        SimError::Validation("Subscription ID or name must be provided.".to_string())
    );
}

#[test]
fn test_account_list_unknown_subscription() {
    let err = engine().account_list("sub-ghost").unwrap_err();
    assert_eq!(
        err,
        SimError::SubscriptionNotFound("Subscription 'sub-ghost' not found.".to_string())
    );
}

#[test]
fn test_kv_list_all() {
    let items = engine()
        .kv_list("sub-test-alpha", "appconfig-store-charlie", None, None)
        .unwrap();
    assert_eq!(items.len(), 3);
}

#[rstest]
#[case(Some("AppName"), None, 2)]
#[case(Some("App*"), None, 2)]
#[case(Some("Locked*"), None, 1)]
#[case(Some("Nope"), None, 0)]
#[case(None, Some("Prod"), 1)]
#[case(None, Some("Pr*"), 1)]
#[case(None, Some("\0"), 2)]
#[case(None, Some("*"), 3)]
#[case(Some("AppName"), Some("Prod"), 1)]
fn test_kv_list_filters(
    #[case] key: Option<&str>,
    #[case] label: Option<&str>,
    #[case] expected: usize,
) {
    let items = engine()
        .kv_list("sub-test-alpha", "appconfig-store-charlie", key, label)
        .unwrap();
    assert_eq!(items.len(), expected);
}

#[test]
fn test_kv_list_unknown_store() {
    let err = engine()
        .kv_list("sub-test-alpha", "missing-store", None, None)
        .unwrap_err();
    assert_eq!(
        err,
        SimError::NotFound(
            "App Configuration store 'missing-store' not found in subscription 'sub-test-alpha'."
                .to_string()
        )
    );
}

#[test]
fn test_kv_set_updates_existing() {
    let engine = engine();
    let item = engine
        .kv_set("sub-test-alpha", "appconfig-store-charlie", "AppName", "NewDemo", None)
        .unwrap();
    assert_eq!(item.value, "NewDemo");
    assert!(!item.locked);
    assert_ne!(item.etag, "etag-0");

    let items = engine
        .kv_list("sub-test-alpha", "appconfig-store-charlie", Some("AppName"), Some("\0"))
        .unwrap();
    assert_eq!(items[0].value, "NewDemo");
}

#[test]
fn test_kv_set_creates_new_item() {
    let engine = engine();
    let item = engine
        .kv_set(
            "sub-test-alpha",
            "appconfig-store-charlie",
            "Fresh",
            "v1",
            Some("Dev"),
        )
        .unwrap();
    assert_eq!(item.label.as_deref(), Some("Dev"));
    assert!(!item.locked);

    let items = engine
        .kv_list("sub-test-alpha", "appconfig-store-charlie", None, None)
        .unwrap();
    assert_eq!(items.len(), 4);
}

#[test]
fn test_kv_set_locked_item_is_rejected_and_unchanged() {
    let engine = engine();
    let err = engine
        .kv_set("sub-test-alpha", "appconfig-store-charlie", "LockedKey1", "X", None)
        .unwrap_err();
    assert_eq!(
        err,
        SimError::Conflict(
            "The key-value 'LockedKey1' with label (No Label) is locked and cannot be modified."
                .to_string()
        )
    );

    let items = engine
        .kv_list("sub-test-alpha", "appconfig-store-charlie", Some("LockedKey1"), None)
        .unwrap();
    assert_eq!(items[0].value, "sealed");
    assert_eq!(items[0].etag, "etag-0");
    assert!(items[0].locked);
}

#[test]
fn test_kv_set_locked_with_label_display() {
    let engine = engine();
    engine
        .kv_lock(
            "sub-test-alpha",
            "appconfig-store-charlie",
            "AppName",
            Some("Prod"),
        )
        .unwrap();
    let err = engine
        .kv_set(
            "sub-test-alpha",
            "appconfig-store-charlie",
            "AppName",
            "X",
            Some("Prod"),
        )
        .unwrap_err();
    assert_eq!(
        err,
        SimError::Conflict(
            "The key-value 'AppName' with label 'Prod' is locked and cannot be modified."
                .to_string()
        )
    );
}

#[rstest]
#[case("", "appconfig-store-charlie", "k", "Subscription ID or name must be provided as a non-empty string.")]
#[case("sub-test-alpha", " ", "k", "App Configuration store name (account_name) must be provided as a non-empty string.")]
#[case("sub-test-alpha", "appconfig-store-charlie", "", "Configuration key must be provided as a non-empty string.")]
fn test_kv_set_validation(
    #[case] subscription: &str,
    #[case] account: &str,
    #[case] key: &str,
    #[case] message: &str,
) {
    let err = engine()
        .kv_set(subscription, account, key, "v", None)
        .unwrap_err();
    assert_eq!(err, SimError::InvalidInput(message.to_string()));
}

#[test]
fn test_kv_lock_sets_flag_and_refreshes_metadata() {
    let engine = engine();
    let item = engine
        .kv_lock("sub-test-alpha", "appconfig-store-charlie", "AppName", None)
        .unwrap();
    assert!(item.locked);
    assert_ne!(item.etag, "etag-0");
    assert_ne!(item.last_modified, "2024-01-01T00:00:00Z");
}

#[test]
fn test_kv_lock_already_locked() {
    let err = engine()
        .kv_lock("sub-test-alpha", "appconfig-store-charlie", "LockedKey1", None)
        .unwrap_err();
    assert_eq!(
        err,
        SimError::Conflict(
            "Key-value item with key 'LockedKey1' and label 'None' is already locked.".to_string()
        )
    );
}

#[test]
fn test_kv_lock_missing_item() {
    let err = engine()
        .kv_lock("sub-test-alpha", "appconfig-store-charlie", "Nope", None)
        .unwrap_err();
    assert_eq!(
        err,
        SimError::NotFound(
            "Key-value item with key 'Nope' and label 'None' not found in App Configuration \
             store 'appconfig-store-charlie'."
                .to_string()
        )
    );
}

#[test]
fn test_kv_unlock_round_trip() {
    let engine = engine();
    let item = engine
        .kv_unlock("sub-test-alpha", "appconfig-store-charlie", "LockedKey1", None)
        .unwrap();
    assert!(!item.locked);

    // Now writable again.
    engine
        .kv_set("sub-test-alpha", "appconfig-store-charlie", "LockedKey1", "open", None)
        .unwrap();
}

#[test]
fn test_kv_unlock_already_unlocked() {
    let err = engine()
        .kv_unlock("sub-test-alpha", "appconfig-store-charlie", "AppName", None)
        .unwrap_err();
    assert_eq!(
        err,
        SimError::Conflict(
            "Key-value 'AppName' with label (none) in store 'appconfig-store-charlie' is \
             already unlocked."
                .to_string()
        )
    );
}

#[test]
fn test_kv_delete_removes_only_matching_label() {
    let engine = engine();
    engine
        .kv_delete("sub-test-alpha", "appconfig-store-charlie", "AppName", None)
        .unwrap();

    let items = engine
        .kv_list("sub-test-alpha", "appconfig-store-charlie", Some("AppName"), None)
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label.as_deref(), Some("Prod"));
}

#[rstest]
#[case(None, "Key-value with key 'Ghost' and default label not found in store 'appconfig-store-charlie'.")]
#[case(Some("Prod"), "Key-value with key 'Ghost' and label 'Prod' not found in store 'appconfig-store-charlie'.")]
fn test_kv_delete_missing_item(#[case] label: Option<&str>, #[case] message: &str) {
    let err = engine()
        .kv_delete("sub-test-alpha", "appconfig-store-charlie", "Ghost", label)
        .unwrap_err();
    assert_eq!(err, SimError::NotFound(message.to_string()));
}

#[test]
fn test_kv_delete_empty_key() {
    let err = engine()
        .kv_delete("sub-test-alpha", "appconfig-store-charlie", "", None)
        .unwrap_err();
    assert_eq!(err, SimError::InvalidInput("Key cannot be empty.".to_string()));
}
