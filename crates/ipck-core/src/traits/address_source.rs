// # Address Source Trait
//
// Defines the interface for capturing the addresses bound to a network
// interface at the moment of a check.
//
// ## Implementations
//
// - OS interface table: `ipck-source-ifaddrs` crate
// - `ifconfig` output: `ipck-source-ifconfig` crate
// - Fixed table: [`crate::source::StaticAddressSource`]
//
// ## Usage
//
// ```rust,ignore
// use ipck_core::AddressSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* AddressSource implementation */;
//
//     match source.capture("eth0").await? {
//         Some(addrs) => println!("{} addresses", addrs.len()),
//         None => println!("eth0 not present"),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::config::AddressSourceConfig;
use crate::model::InterfaceAddresses;

/// Trait for address source implementations
///
/// A source is an **observer**: it reports what the operating system has
/// bound to an interface right now and nothing else.
///
/// ## Allowed
/// - ✅ Platform-specific I/O (interface tables, running `ifconfig`)
/// - ✅ Normalising address text (dropping `%zone` suffixes)
///
/// ## Forbidden
/// - ❌ Reading or writing snapshots (owned by `SnapshotStore`)
/// - ❌ Filtering by scope or choosing a primary (owned by `CheckEngine`)
/// - ❌ Retrying on failure (belongs to whatever schedules the check)
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Capture the current addresses of `interface`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(addrs))`: The interface exists; `addrs` may be empty
    /// - `Ok(None)`: The interface is not present on this host
    /// - `Err(Error)`: The capture mechanism itself failed
    async fn capture(&self, interface: &str) -> Result<Option<InterfaceAddresses>, crate::Error>;

    /// Short name used in logs and the source registry
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing address sources from configuration
pub trait AddressSourceFactory: Send + Sync {
    /// Create an AddressSource instance from configuration
    ///
    /// # Returns
    ///
    /// A boxed AddressSource trait object
    fn create(&self, config: &AddressSourceConfig)
    -> Result<Box<dyn AddressSource>, crate::Error>;
}
