//! Check engine
//!
//! The CheckEngine runs one check cycle:
//!
//! ```text
//! ┌───────────────┐   capture    ┌──────────────┐   load/save   ┌───────────────┐
//! │ AddressSource │────────────▶│ CheckEngine  │◀────────────▶│ SnapshotStore │
//! └───────────────┘              └──────────────┘               └───────────────┘
//!                                       │
//!                             diff → filter → select
//!                                       │
//!                                       ▼
//!                                 CheckReport
//! ```
//!
//! ## Flow
//!
//! 1. Capture the interface's current addresses
//! 2. Load the previous snapshot (absent on first run)
//! 3. Diff the queried protocol and apply the scope filter
//! 4. Carry every previous primary forward, then select the queried one
//! 5. Persist the new snapshot unless running read-only
//!
//! The engine holds no state between checks; the snapshot file is the only
//! memory. It does not schedule itself.

use chrono::{DateTime, FixedOffset, Local};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::config::CheckConfig;
use crate::diff::AddressDiff;
use crate::error::Result;
use crate::model::{InterfaceAddresses, InterfaceRecord, Snapshot};
use crate::report::CheckReport;
use crate::select::{SelectionOutcome, select_primary};
use crate::traits::{AddressSource, SnapshotStore};

/// Everything a check produced
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// What to show the caller
    pub report: CheckReport,
    /// The new snapshot, or `None` when the interface was not captured
    pub snapshot: Option<Snapshot>,
    /// Whether `snapshot` was written to the store
    pub persisted: bool,
}

/// Runs check cycles against a source and a store
pub struct CheckEngine {
    /// Where current addresses come from
    source: Box<dyn AddressSource>,

    /// Where snapshots live between runs
    store: Box<dyn SnapshotStore>,

    config: CheckConfig,
}

impl CheckEngine {
    /// Create a new check engine
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)` if `config` does not validate
    pub fn new(
        source: Box<dyn AddressSource>,
        store: Box<dyn SnapshotStore>,
        config: CheckConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            store,
            config,
        })
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Run one check, stamping the snapshot with the current local time
    pub async fn check(&self) -> Result<CheckOutcome> {
        self.check_at(Local::now().fixed_offset()).await
    }

    /// Run one check, stamping the snapshot with `now`
    pub async fn check_at(&self, now: DateTime<FixedOffset>) -> Result<CheckOutcome> {
        let interface = self.config.interface.as_str();
        let protocol = self.config.protocol;
        let scope = self.config.effective_scope();

        let captured = self.source.capture(interface).await?;
        match &captured {
            Some(addrs) => debug!(
                "Captured {} address(es) on {} via {}",
                addrs.len(),
                interface,
                self.source.source_name()
            ),
            None => warn!(
                "Interface {} not found by {} source; treating as no addresses",
                interface,
                self.source.source_name()
            ),
        }

        let previous = self.store.load(interface).await?;
        let previous_record = previous.as_ref().and_then(|s| s.interface(interface));
        if previous_record.is_none() {
            debug!("No history for {}", interface);
        }

        let previous_set = previous_record
            .map(|r| r.address_set(protocol))
            .unwrap_or_default();
        let current_set: BTreeSet<String> = captured
            .as_ref()
            .map(|a| a.addresses(protocol).iter().cloned().collect())
            .unwrap_or_default();

        let diff = AddressDiff::between(&previous_set, &current_set).filtered(scope);
        debug!(
            "{} {} ({}): {} appeared, {} remained, {} gone",
            interface,
            protocol,
            scope,
            diff.appeared.len(),
            diff.remained.len(),
            diff.gone.len()
        );

        let previous_primary = previous_record.and_then(|r| r.primary(protocol));

        let Some(captured) = captured else {
            // Nothing to select from or persist; report the prior state as is
            let report = CheckReport::new(
                interface,
                protocol,
                scope,
                diff,
                previous_primary.map(str::to_string),
                false,
            );
            return Ok(CheckOutcome {
                report,
                snapshot: None,
                persisted: false,
            });
        };

        let snapshot = self.next_snapshot(captured, previous_record, &diff, now);
        let record = snapshot.interface(interface);
        let primary = record.and_then(|r| r.primary(protocol)).map(str::to_string);
        let changed = diff.is_changed();

        let persisted = if self.config.no_update {
            debug!("Read-only check, snapshot for {} not saved", interface);
            false
        } else {
            self.store.save(interface, &snapshot).await?;
            info!("Saved snapshot for {}", interface);
            true
        };

        Ok(CheckOutcome {
            report: CheckReport::new(interface, protocol, scope, diff, primary, changed),
            snapshot: Some(snapshot),
            persisted,
        })
    }

    /// Build the snapshot this run leaves behind
    fn next_snapshot(
        &self,
        captured: InterfaceAddresses,
        previous: Option<&InterfaceRecord>,
        diff: &AddressDiff,
        now: DateTime<FixedOffset>,
    ) -> Snapshot {
        let protocol = self.config.protocol;
        let interface = self.config.interface.as_str();

        let mut record = InterfaceRecord::from(captured);
        if let Some(previous) = previous {
            record = record.with_primaries_from(previous);
        }

        let previous_primary = previous.and_then(|r| r.primary(protocol));
        let selection = select_primary(diff, previous_primary);
        match selection.outcome {
            SelectionOutcome::Kept => {
                debug!("Primary {} address of {} kept", protocol, interface)
            }
            SelectionOutcome::Cleared => {
                if previous_primary.is_some() {
                    warn!("No eligible {} address left on {}", protocol, interface);
                }
            }
            outcome => info!(
                "Primary {} address of {}: {} -> {} ({:?})",
                protocol,
                interface,
                previous_primary.unwrap_or("none"),
                selection.primary.as_deref().unwrap_or("none"),
                outcome
            ),
        }
        record.set_primary(protocol, selection.primary);

        Snapshot::single(interface, record, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckConfig;
    use crate::model::Protocol;
    use crate::source::StaticAddressSource;
    use crate::state::MemorySnapshotStore;

    fn addrs(list: &[&str]) -> InterfaceAddresses {
        list.iter().map(|a| a.parse().unwrap()).collect()
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let result = CheckEngine::new(
            Box::new(StaticAddressSource::new()),
            Box::new(MemorySnapshotStore::new()),
            CheckConfig::new("../etc"),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_engine_carries_other_protocol_primary() {
        let source = StaticAddressSource::new()
            .with_interface("eth0", addrs(&["192.0.2.1", "2001:db8::1"]));
        let store = MemorySnapshotStore::new();

        // inet run records the IPv4 primary
        let engine = CheckEngine::new(
            Box::new(source.clone()),
            Box::new(store.clone()),
            CheckConfig::new("eth0").with_protocol(Protocol::Inet),
        )
        .unwrap();
        engine.check().await.unwrap();

        // inet6 run must keep it
        let engine = CheckEngine::new(
            Box::new(source),
            Box::new(store.clone()),
            CheckConfig::new("eth0"),
        )
        .unwrap();
        let outcome = engine.check().await.unwrap();

        let record = outcome.snapshot.as_ref().unwrap().interface("eth0").unwrap();
        assert_eq!(record.primary(Protocol::Inet), Some("192.0.2.1"));
        assert_eq!(record.primary(Protocol::Inet6), Some("2001:db8::1"));
    }
}
