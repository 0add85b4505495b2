//! Fixed-table address source
//!
//! Serves captures from a table set up in advance. Used by tests and by
//! embedders that obtain interface addresses through their own means.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::Error;
use crate::model::InterfaceAddresses;
use crate::traits::AddressSource;

/// Address source backed by an in-memory table
///
/// Clones share the same table, so a test can change what the next capture
/// returns while the engine holds its own handle.
#[derive(Debug, Clone, Default)]
pub struct StaticAddressSource {
    interfaces: Arc<RwLock<HashMap<String, InterfaceAddresses>>>,
}

impl StaticAddressSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StaticAddressSource::set`]
    pub fn with_interface(self, name: impl Into<String>, addrs: InterfaceAddresses) -> Self {
        self.set(name, addrs);
        self
    }

    /// Set what captures of `name` return from now on
    pub fn set(&self, name: impl Into<String>, addrs: InterfaceAddresses) {
        let mut table = self
            .interfaces
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        table.insert(name.into(), addrs);
    }

    /// Make `name` absent from the table
    pub fn remove(&self, name: &str) {
        let mut table = self
            .interfaces
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        table.remove(name);
    }
}

#[async_trait]
impl AddressSource for StaticAddressSource {
    async fn capture(&self, interface: &str) -> Result<Option<InterfaceAddresses>, Error> {
        let table = self
            .interfaces
            .read()
            .map_err(|_| Error::capture("static address table lock poisoned"))?;
        Ok(table.get(interface).cloned())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
