//! Snapshot data model
//!
//! The on-disk shape is kept compatible with the JSON written by earlier
//! releases of the checker:
//!
//! ```json
//! {
//!   "ifaces": {
//!     "eth0": {
//!       "inet": ["192.0.2.10"],
//!       "inet6": ["2001:db8::1", "fe80::1"],
//!       "inet6_primary": "2001:db8::1"
//!     }
//!   },
//!   "time": "2025-01-09T12:00:00.000000+09:00"
//! }
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Protocol family of an address list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// IPv4
    Inet,
    /// IPv6
    Inet6,
}

impl Protocol {
    /// All protocols, in the order primaries are carried forward
    pub const ALL: [Protocol; 2] = [Protocol::Inet6, Protocol::Inet];

    /// Protocol of a parsed address
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Protocol::Inet,
            IpAddr::V6(_) => Protocol::Inet6,
        }
    }

    /// Key name used in snapshot files
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Inet => "inet",
            Protocol::Inet6 => "inet6",
        }
    }

    /// Key under which this protocol's primary address is recorded
    pub fn primary_key(&self) -> &'static str {
        match self {
            Protocol::Inet => "inet_primary",
            Protocol::Inet6 => "inet6_primary",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inet" => Ok(Protocol::Inet),
            "inet6" => Ok(Protocol::Inet6),
            other => Err(crate::Error::config(format!(
                "Unknown protocol family '{}' (expected inet or inet6)",
                other
            ))),
        }
    }
}

/// Address scope filter applied to IPv6 diffs
///
/// The predicates are textual prefix checks on the captured form, not CIDR
/// matches: `2...` covers the commonly assigned part of `2000::/3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressScope {
    /// No filtering
    All,
    /// Global unicast
    #[default]
    Gua,
    /// Unique local (`fc00::/7`)
    Ula,
}

impl AddressScope {
    /// Whether `addr` passes this filter
    pub fn admits(&self, addr: &str) -> bool {
        match self {
            AddressScope::All => true,
            AddressScope::Gua => addr.starts_with('2'),
            AddressScope::Ula => addr.starts_with("fd") || addr.starts_with("fc"),
        }
    }

    /// The filter that actually applies to `protocol`
    ///
    /// Scopes only mean something for IPv6; IPv4 is never filtered.
    pub fn effective_for(self, protocol: Protocol) -> Self {
        match protocol {
            Protocol::Inet => AddressScope::All,
            Protocol::Inet6 => self,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressScope::All => "all",
            AddressScope::Gua => "gua",
            AddressScope::Ula => "ula",
        }
    }
}

impl fmt::Display for AddressScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressScope {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(AddressScope::All),
            "gua" => Ok(AddressScope::Gua),
            "ula" => Ok(AddressScope::Ula),
            other => Err(crate::Error::config(format!(
                "Unknown address type '{}' (expected gua or ula)",
                other
            ))),
        }
    }
}

/// Addresses captured for one interface during a single run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceAddresses {
    #[serde(default)]
    inet: Vec<String>,
    #[serde(default)]
    inet6: Vec<String>,
}

impl InterfaceAddresses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an address under its family, ignoring repeats
    pub fn push(&mut self, addr: IpAddr) {
        let list = match Protocol::of(&addr) {
            Protocol::Inet => &mut self.inet,
            Protocol::Inet6 => &mut self.inet6,
        };
        let text = addr.to_string();
        if !list.contains(&text) {
            list.push(text);
        }
    }

    /// Captured addresses for `protocol`, in capture order
    pub fn addresses(&self, protocol: Protocol) -> &[String] {
        match protocol {
            Protocol::Inet => &self.inet,
            Protocol::Inet6 => &self.inet6,
        }
    }

    /// Total number of captured addresses across both families
    pub fn len(&self) -> usize {
        self.inet.len() + self.inet6.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inet.is_empty() && self.inet6.is_empty()
    }
}

impl FromIterator<IpAddr> for InterfaceAddresses {
    fn from_iter<I: IntoIterator<Item = IpAddr>>(iter: I) -> Self {
        let mut addrs = Self::new();
        for addr in iter {
            addrs.push(addr);
        }
        addrs
    }
}

/// Persisted state of one interface
///
/// Address lists are required when decoding so that a truncated or hand-edited
/// file surfaces as corrupt state instead of an empty history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    inet: Vec<String>,
    inet6: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inet_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inet6_primary: Option<String>,
}

impl InterfaceRecord {
    /// Addresses recorded for `protocol`
    pub fn addresses(&self, protocol: Protocol) -> &[String] {
        match protocol {
            Protocol::Inet => &self.inet,
            Protocol::Inet6 => &self.inet6,
        }
    }

    /// Addresses recorded for `protocol` with duplicates collapsed
    pub fn address_set(&self, protocol: Protocol) -> BTreeSet<String> {
        self.addresses(protocol).iter().cloned().collect()
    }

    /// Recorded primary address for `protocol`, if any
    pub fn primary(&self, protocol: Protocol) -> Option<&str> {
        match protocol {
            Protocol::Inet => self.inet_primary.as_deref(),
            Protocol::Inet6 => self.inet6_primary.as_deref(),
        }
    }

    /// Replace the primary address for `protocol`; `None` clears it
    pub fn set_primary(&mut self, protocol: Protocol, primary: Option<String>) {
        match protocol {
            Protocol::Inet => self.inet_primary = primary,
            Protocol::Inet6 => self.inet6_primary = primary,
        }
    }

    /// Copy every primary recorded in `previous` into this record verbatim
    ///
    /// Protocols the current run does not query keep their value this way.
    pub fn with_primaries_from(mut self, previous: &InterfaceRecord) -> Self {
        for protocol in Protocol::ALL {
            if let Some(primary) = previous.primary(protocol) {
                self.set_primary(protocol, Some(primary.to_string()));
            }
        }
        self
    }
}

impl From<InterfaceAddresses> for InterfaceRecord {
    fn from(addrs: InterfaceAddresses) -> Self {
        Self {
            inet: addrs.inet,
            inet6: addrs.inet6,
            inet_primary: None,
            inet6_primary: None,
        }
    }
}

/// Recorded state of the tracked interfaces at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Interface name to record; in practice a single entry
    #[serde(rename = "ifaces")]
    pub interfaces: BTreeMap<String, InterfaceRecord>,

    /// When the snapshot was captured, with the local UTC offset
    #[serde(rename = "time")]
    pub captured_at: DateTime<FixedOffset>,
}

impl Snapshot {
    /// Snapshot holding a single interface record
    pub fn single(
        interface: impl Into<String>,
        record: InterfaceRecord,
        captured_at: DateTime<FixedOffset>,
    ) -> Self {
        let mut interfaces = BTreeMap::new();
        interfaces.insert(interface.into(), record);
        Self {
            interfaces,
            captured_at,
        }
    }

    /// Record for `name`, if present
    pub fn interface(&self, name: &str) -> Option<&InterfaceRecord> {
        self.interfaces.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}
