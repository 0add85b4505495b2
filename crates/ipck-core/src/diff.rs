//! Snapshot comparison
//!
//! Classifies every address seen in either snapshot as appeared, remained or
//! gone. The three sets always partition `previous ∪ current`.

use crate::model::AddressScope;
use serde::Serialize;
use std::collections::BTreeSet;

/// Three-way classification of one protocol's addresses between two runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressDiff {
    /// In the current capture only
    pub appeared: BTreeSet<String>,
    /// In both the previous snapshot and the current capture
    pub remained: BTreeSet<String>,
    /// In the previous snapshot only
    pub gone: BTreeSet<String>,
}

impl AddressDiff {
    /// Compare a previous address set with the current one
    ///
    /// An empty `previous` is the first-run case: everything appeared.
    pub fn between(previous: &BTreeSet<String>, current: &BTreeSet<String>) -> Self {
        Self {
            appeared: current.difference(previous).cloned().collect(),
            remained: previous.intersection(current).cloned().collect(),
            gone: previous.difference(current).cloned().collect(),
        }
    }

    /// Keep only the addresses `scope` admits, in all three sets
    pub fn filtered(self, scope: AddressScope) -> Self {
        if scope == AddressScope::All {
            return self;
        }
        let keep = |set: BTreeSet<String>| -> BTreeSet<String> {
            set.into_iter().filter(|addr| scope.admits(addr)).collect()
        };
        Self {
            appeared: keep(self.appeared),
            remained: keep(self.remained),
            gone: keep(self.gone),
        }
    }

    /// Whether any address joined or left
    pub fn is_changed(&self) -> bool {
        !self.appeared.is_empty() || !self.gone.is_empty()
    }

    /// Whether `addr` was present both before and now
    pub fn is_stable(&self, addr: &str) -> bool {
        self.remained.contains(addr)
    }
}
