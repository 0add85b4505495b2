//! Test doubles and common utilities for contract tests

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use ipck_core::error::{Error, Result};
use ipck_core::model::{InterfaceAddresses, Snapshot};
use ipck_core::traits::{AddressSource, SnapshotStore};
use ipck_core::{CheckConfig, CheckEngine, MemorySnapshotStore, StaticAddressSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a capture from address literals
pub fn addrs(list: &[&str]) -> InterfaceAddresses {
    list.iter()
        .map(|a| a.parse().expect("valid address literal"))
        .collect()
}

/// Fixed timestamp for run `n`
pub fn at(n: u32) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(&format!("2025-01-09T12:{:02}:00+09:00", n))
        .expect("valid timestamp")
}

/// A snapshot store that counts calls and delegates to memory
#[derive(Clone, Default)]
pub struct CountingStore {
    inner: MemorySnapshotStore,
    load_calls: Arc<AtomicUsize>,
    save_calls: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SnapshotStore for CountingStore {
    async fn load(&self, interface: &str) -> Result<Option<Snapshot>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.load(interface).await
    }

    async fn save(&self, interface: &str, snapshot: &Snapshot) -> Result<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.save(interface, snapshot).await
    }
}

/// A snapshot store whose saves always fail
pub struct ReadOnlyStore;

#[async_trait::async_trait]
impl SnapshotStore for ReadOnlyStore {
    async fn load(&self, _interface: &str) -> Result<Option<Snapshot>> {
        Ok(None)
    }

    async fn save(&self, _interface: &str, _snapshot: &Snapshot) -> Result<()> {
        Err(Error::state_store("read-only file system"))
    }
}

/// An address source whose capture mechanism is broken
pub struct BrokenSource;

#[async_trait::async_trait]
impl AddressSource for BrokenSource {
    async fn capture(&self, _interface: &str) -> Result<Option<InterfaceAddresses>> {
        Err(Error::capture("ifconfig: command not found"))
    }

    fn source_name(&self) -> &'static str {
        "broken"
    }
}

/// Engine over shared handles, so successive "runs" see each other's state
pub fn engine<S>(source: &StaticAddressSource, store: &S, config: CheckConfig) -> CheckEngine
where
    S: SnapshotStore + Clone + 'static,
{
    CheckEngine::new(Box::new(source.clone()), Box::new(store.clone()), config)
        .expect("engine construction succeeds")
}
