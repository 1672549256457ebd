// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! End-to-end state lifecycle tests over the shipped fixtures.

use std::path::PathBuf;

use vendorless::{SimError, SimWorld};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

#[test]
fn test_fixtures_seed_every_engine() {
    let world = SimWorld::from_fixtures(&fixtures_dir()).unwrap();

    let stores = world.appconfig().account_list("sub-test-alpha").unwrap();
    assert_eq!(stores[0].name, "appconfig-store-charlie");

    let values = world
        .sheets()
        .values_get("sheet-budget-001", "Sheet1!A1:B1")
        .unwrap();
    assert_eq!(values.values[0], vec!["item", "amount"]);

    let members = world
        .chat()
        .list_memberships("spaces/AAQAtjsc9v4", None, None, None)
        .unwrap();
    assert_eq!(members.memberships.len(), 3);

    let read = world.sandbox().read_file("README.md", None, None).unwrap();
    assert!(read.content.starts_with("# Demo Workspace"));
}

#[test]
fn test_locked_key_rejects_set_and_state_is_unchanged() {
    let world = SimWorld::from_fixtures(&fixtures_dir()).unwrap();
    let before = world.snapshot();

    let err = world
        .appconfig()
        .kv_set(
            "sub-test-alpha",
            "appconfig-store-charlie",
            "LockedKey1",
            "X",
            None,
        )
        .unwrap_err();
    assert_eq!(
        err,
        SimError::Conflict(
            "The key-value 'LockedKey1' with label (No Label) is locked and cannot be modified."
                .to_string()
        )
    );
    assert_eq!(world.snapshot().appconfig, before.appconfig);
}

#[test]
fn test_save_then_load_reproduces_state() {
    let dir = tempfile::tempdir().unwrap();
    let world = SimWorld::from_fixtures(&fixtures_dir()).unwrap();

    world
        .appconfig()
        .kv_set(
            "sub-test-alpha",
            "appconfig-store-charlie",
            "NewKey",
            "fresh",
            Some("Dev"),
        )
        .unwrap();
    world.save_state(dir.path()).unwrap();
    let saved = world.snapshot();

    // Rebuild from the saved directory and compare.
    let reloaded = SimWorld::from_fixtures(dir.path()).unwrap();
    assert_eq!(reloaded.snapshot().appconfig, saved.appconfig);
    assert_eq!(reloaded.snapshot().sheets, saved.sheets);
    assert_eq!(reloaded.snapshot().chat, saved.chat);
    assert_eq!(reloaded.snapshot().sandbox, saved.sandbox);
}

#[test]
fn test_set_is_idempotent_except_etag() {
    let world = SimWorld::from_fixtures(&fixtures_dir()).unwrap();
    let first = world
        .appconfig()
        .kv_set(
            "sub-test-alpha",
            "appconfig-store-charlie",
            "AppName",
            "Same",
            None,
        )
        .unwrap();
    let second = world
        .appconfig()
        .kv_set(
            "sub-test-alpha",
            "appconfig-store-charlie",
            "AppName",
            "Same",
            None,
        )
        .unwrap();

    assert_eq!(first.key, second.key);
    assert_eq!(first.value, second.value);
    assert_eq!(first.label, second.label);
    assert_eq!(first.locked, second.locked);
    assert_ne!(first.etag, second.etag);
}

#[test]
fn test_concurrent_reads_during_writes() {
    let world = SimWorld::from_fixtures(&fixtures_dir()).unwrap();

    std::thread::scope(|scope| {
        let writer = scope.spawn(|| {
            for i in 0..50 {
                world
                    .appconfig()
                    .kv_set(
                        "sub-test-alpha",
                        "appconfig-store-charlie",
                        "HotKey",
                        &format!("v{i}"),
                        None,
                    )
                    .unwrap();
            }
        });
        let reader = scope.spawn(|| {
            for _ in 0..50 {
                let items = world
                    .appconfig()
                    .kv_list("sub-test-alpha", "appconfig-store-charlie", None, None)
                    .unwrap();
                assert!(items.len() >= 3);
            }
        });
        writer.join().unwrap();
        reader.join().unwrap();
    });

    let items = world
        .appconfig()
        .kv_list(
            "sub-test-alpha",
            "appconfig-store-charlie",
            Some("HotKey"),
            None,
        )
        .unwrap();
    assert_eq!(items[0].value, "v49");
}

#[test]
fn test_snapshot_restore_round_trip_across_engines() {
    let world = SimWorld::from_fixtures(&fixtures_dir()).unwrap();
    let before = world.snapshot();

    world
        .sheets()
        .values_update(
            "sheet-budget-001",
            "Sheet1!B2",
            &[vec!["9999".to_string()]],
        )
        .unwrap();
    world.sandbox().write_file("scratch.txt", "tmp\n").unwrap();

    world.restore(before.clone());
    let after = world.snapshot();
    assert_eq!(after.sheets, before.sheets);
    assert_eq!(after.sandbox, before.sandbox);
}
