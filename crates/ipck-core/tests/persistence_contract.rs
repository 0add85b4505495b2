//! Contract Test: Persistence & failure policy
//!
//! Constraints verified:
//! - Read-only checks never write
//! - A missing interface never overwrites the last good snapshot
//! - Corrupt history fails the run instead of being discarded
//! - Capture and write failures propagate

mod common;

use common::*;
use ipck_core::{
    CheckConfig, CheckEngine, Error, FileSnapshotStore, SnapshotStore, StaticAddressSource,
};
use tempfile::tempdir;

#[tokio::test]
async fn no_update_leaves_store_untouched() {
    let source = StaticAddressSource::new().with_interface("eth0", addrs(&["2001:db8::1"]));
    let store = CountingStore::new();
    let config = CheckConfig::new("eth0").with_no_update(true);

    let first = engine(&source, &store, config.clone()).check_at(at(1)).await.unwrap();
    assert!(!first.persisted);
    assert_eq!(store.save_calls(), 0);
    assert!(first.snapshot.is_some());

    // Nothing was saved, so the address is still "new"
    let second = engine(&source, &store, config).check_at(at(2)).await.unwrap();
    assert_eq!(second.report.appeared, vec!["2001:db8::1".to_string()]);
    assert!(second.report.changed);
    assert_eq!(store.load_calls(), 2);
}

#[tokio::test]
async fn missing_interface_keeps_previous_state() {
    let dir = tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path());
    let source = StaticAddressSource::new().with_interface("eth0", addrs(&["2001:db8::1"]));
    let config = CheckConfig::new("eth0");

    engine(&source, &store, config.clone()).check_at(at(1)).await.unwrap();
    let before = store.load("eth0").await.unwrap();

    source.remove("eth0");
    let run = engine(&source, &store, config).check_at(at(2)).await.unwrap();

    assert!(!run.report.changed);
    assert!(!run.persisted);
    assert!(run.snapshot.is_none());
    assert_eq!(run.report.primary.as_deref(), Some("2001:db8::1"));
    assert_eq!(run.report.gone, vec!["2001:db8::1".to_string()]);
    assert_eq!(store.load("eth0").await.unwrap(), before);
}

#[tokio::test]
async fn interface_without_addresses_is_recorded() {
    let store = CountingStore::new();
    let source = StaticAddressSource::new().with_interface("eth0", addrs(&["2001:db8::1"]));
    let config = CheckConfig::new("eth0");

    engine(&source, &store, config.clone()).check_at(at(1)).await.unwrap();

    // The interface is up but lost its addresses: that is a real change
    source.set("eth0", addrs(&[]));
    let run = engine(&source, &store, config).check_at(at(2)).await.unwrap();
    assert!(run.report.changed);
    assert_eq!(run.report.primary, None);
    assert!(run.persisted);
    assert_eq!(store.save_calls(), 2);
}

#[tokio::test]
async fn corrupt_snapshot_fails_the_run() {
    let dir = tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path());
    std::fs::write(dir.path().join("eth0.json"), "{\"ifaces\": ").unwrap();
    let source = StaticAddressSource::new().with_interface("eth0", addrs(&["2001:db8::1"]));

    let err = engine(&source, &store, CheckConfig::new("eth0"))
        .check_at(at(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CorruptState { .. }), "got {err:?}");

    // The corrupt file is left for inspection
    let raw = std::fs::read_to_string(dir.path().join("eth0.json")).unwrap();
    assert_eq!(raw, "{\"ifaces\": ");
}

#[tokio::test]
async fn capture_failure_propagates() {
    let engine = CheckEngine::new(
        Box::new(BrokenSource),
        Box::new(CountingStore::new()),
        CheckConfig::new("eth0"),
    )
    .unwrap();

    let err = engine.check().await.unwrap_err();
    assert!(matches!(err, Error::Capture(_)));
}

#[tokio::test]
async fn write_failure_propagates_unless_read_only() {
    let source = StaticAddressSource::new().with_interface("eth0", addrs(&["2001:db8::1"]));

    let engine_rw = CheckEngine::new(
        Box::new(source.clone()),
        Box::new(ReadOnlyStore),
        CheckConfig::new("eth0"),
    )
    .unwrap();
    assert!(matches!(
        engine_rw.check_at(at(1)).await,
        Err(Error::StateStore(_))
    ));

    let engine_ro = CheckEngine::new(
        Box::new(source),
        Box::new(ReadOnlyStore),
        CheckConfig::new("eth0").with_no_update(true),
    )
    .unwrap();
    let outcome = engine_ro.check_at(at(1)).await.unwrap();
    assert_eq!(outcome.report.primary.as_deref(), Some("2001:db8::1"));
}
