// # Interface Table Address Source
//
// Captures addresses from the operating system's interface table
// (`getifaddrs(3)` on Unix, `GetAdaptersAddresses` on Windows) through the
// `if-addrs` crate.
//
// ## Behavior
//
// - One entry is returned per (interface, address) pair; entries are grouped
//   by interface name and routed to `inet`/`inet6` by family
// - An interface with no addresses does not appear in the table, so it is
//   reported as absent: losing every address leaves the last snapshot in
//   place. The ifconfig source reports such an interface as present and empty.
// - IPv6 addresses are rendered without zone suffix

use async_trait::async_trait;
use ipck_core::config::AddressSourceConfig;
use ipck_core::model::InterfaceAddresses;
use ipck_core::traits::{AddressSource, AddressSourceFactory};
use ipck_core::{Error, Result, SourceRegistry};
use std::net::IpAddr;

/// Address source reading the OS interface table
#[derive(Debug, Clone, Copy, Default)]
pub struct IfaddrsSource;

impl IfaddrsSource {
    pub fn new() -> Self {
        Self
    }
}

/// Collect the addresses of `interface` from (name, address) pairs
///
/// Returns `None` when no pair names the interface.
pub fn collect_interface<I>(entries: I, interface: &str) -> Option<InterfaceAddresses>
where
    I: IntoIterator<Item = (String, IpAddr)>,
{
    let mut found = false;
    let mut addrs = InterfaceAddresses::new();
    for (name, ip) in entries {
        if name == interface {
            found = true;
            addrs.push(ip);
        }
    }
    found.then_some(addrs)
}

#[async_trait]
impl AddressSource for IfaddrsSource {
    async fn capture(&self, interface: &str) -> Result<Option<InterfaceAddresses>> {
        let table = tokio::task::spawn_blocking(if_addrs::get_if_addrs)
            .await
            .map_err(|e| Error::capture(format!("Interface enumeration task failed: {}", e)))?
            .map_err(|e| Error::capture(format!("Failed to enumerate interfaces: {}", e)))?;

        tracing::trace!("Interface table has {} entries", table.len());

        let entries = table.into_iter().map(|iface| {
            let ip = iface.ip();
            (iface.name, ip)
        });
        Ok(collect_interface(entries, interface))
    }

    fn source_name(&self) -> &'static str {
        "ifaddrs"
    }
}

/// Factory for creating interface table sources
pub struct IfaddrsFactory;

impl AddressSourceFactory for IfaddrsFactory {
    fn create(&self, config: &AddressSourceConfig) -> Result<Box<dyn AddressSource>> {
        match config {
            AddressSourceConfig::Ifaddrs => Ok(Box::new(IfaddrsSource::new())),
            _ => Err(Error::config("Invalid config for ifaddrs address source")),
        }
    }
}

/// Register the interface table source with a registry
pub fn register(registry: &mut SourceRegistry) {
    registry.register_source("ifaddrs", Box::new(IfaddrsFactory));
}
