#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use rstest::rstest;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Counters {
    hits: u32,
    labels: Vec<String>,
}

#[test]
fn test_read_write_accessors() {
    let store = SimStore::new(Counters::default());
    store.write(|s| {
        s.hits = 3;
        s.labels.push("prod".to_string());
    });
    assert_eq!(store.read(|s| s.hits), 3);
    assert_eq!(store.read(|s| s.labels.clone()), vec!["prod".to_string()]);
}

#[test]
fn test_save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let store = SimStore::new(Counters {
        hits: 7,
        labels: vec!["a".to_string(), "b".to_string()],
    });
    store.save_state(&path).unwrap();

    let before = store.snapshot();
    store.write(|s| s.hits = 0);
    store.load_state(&path).unwrap();

    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_snapshot_restore_is_deep() {
    let store = SimStore::new(Counters {
        hits: 1,
        labels: vec!["x".to_string()],
    });
    let snap = store.snapshot();

    store.write(|s| {
        s.hits = 99;
        s.labels.clear();
    });
    store.restore(snap);

    assert_eq!(store.read(|s| s.hits), 1);
    assert_eq!(store.read(|s| s.labels.len()), 1);
}

#[test]
fn test_from_fixture_missing_file_errors() {
    let err = SimStore::<Counters>::from_fixture(std::path::Path::new("/nonexistent/f.json"))
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::Fixture { .. }));
    assert!(err.to_string().contains("/nonexistent/f.json"));
}

#[test]
fn test_from_fixture_or_default_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let store =
        SimStore::<Counters>::from_fixture_or_default(&dir.path().join("missing.json")).unwrap();
    assert_eq!(store.snapshot(), Counters::default());
}

#[rstest]
#[case::malformed("{not json")]
#[case::empty("")]
#[case::wrong_shape("[1, 2, 3]")]
fn test_from_fixture_bad_json_errors(#[case] content: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, content).unwrap();

    let err = SimStore::<Counters>::from_fixture(&path).err().unwrap();
    assert!(matches!(err, StoreError::Json(_)));
}

#[test]
fn test_concurrent_save_load_smoke() {
    // Parallel wholesale save/load must not panic or corrupt in-memory state.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let store = Arc::new(SimStore::new(Counters {
        hits: 42,
        labels: vec!["seed".to_string()],
    }));
    store.save_state(&path).unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        let path = path.clone();
        handles.push(std::thread::spawn(move || {
            for _ in 0..20 {
                if i % 2 == 0 {
                    store.save_state(&path).unwrap();
                } else {
                    // The file may be mid-write by another thread; a parse
                    // failure is acceptable, state corruption is not.
                    let _ = store.load_state(&path);
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let state = store.snapshot();
    assert_eq!(state.hits, 42);
    assert_eq!(state.labels, vec!["seed".to_string()]);
}
