// # ifconfig Address Source
//
// Captures addresses by running `ifconfig` under the C locale and parsing its
// text output. Works on hosts where only the net-tools / BSD userland is
// reliable, at the cost of depending on an output format.
//
// ## Recognised Format
//
// ```text
// eth0: flags=4163<UP,BROADCAST,RUNNING,MULTICAST>  mtu 1500
//         inet 192.0.2.10  netmask 255.255.255.0  broadcast 192.0.2.255
//         inet6 2001:db8::1  prefixlen 64  scopeid 0x0<global>
// en0: flags=8863<UP,BROADCAST,SMART,RUNNING,SIMPLEX,MULTICAST> mtu 1500
//         inet6 fe80::1%en0 prefixlen 64 secured scopeid 0x4
// ```
//
// - A line starting in column 0 with `<name>:` opens an interface block
// - Indented `inet <addr> netmask ...` and `inet6 <addr> prefixlen ...`
//   lines inside the block contribute addresses
// - Zone suffixes (`%en0`) are dropped; anything that does not parse as an IP
//   address is skipped

use async_trait::async_trait;
use ipck_core::config::AddressSourceConfig;
use ipck_core::model::InterfaceAddresses;
use ipck_core::traits::{AddressSource, AddressSourceFactory};
use ipck_core::{Error, Result, SourceRegistry};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tokio::process::Command;

/// Address source that runs `ifconfig`
#[derive(Debug, Clone)]
pub struct IfconfigSource {
    program: String,
}

impl IfconfigSource {
    /// Create a source running `program` (normally `ifconfig`)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .env("LANG", "C")
            .env("LC_ALL", "C")
            .output()
            .await
            .map_err(|e| Error::capture(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(Error::capture(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for IfconfigSource {
    fn default() -> Self {
        Self::new(ipck_core::config::default_ifconfig_program())
    }
}

/// Name of the interface a block header line opens, if it is one
fn header_name(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let (name, _) = line.split_once(':')?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some(name)
}

/// Address carried by an indented `inet`/`inet6` line, if any
fn address_line(line: &str) -> Option<IpAddr> {
    let mut tokens = line.split_whitespace();
    let family = tokens.next()?;
    let addr = tokens.next()?;
    let marker = tokens.next()?;

    match (family, marker) {
        ("inet", "netmask") => addr.parse::<Ipv4Addr>().ok().map(IpAddr::V4),
        ("inet6", "prefixlen") => {
            let addr = addr.split_once('%').map_or(addr, |(a, _zone)| a);
            addr.parse::<Ipv6Addr>().ok().map(IpAddr::V6)
        }
        _ => None,
    }
}

/// Extract the addresses of `interface` from `ifconfig` output
///
/// Returns `None` when no block for the interface is present. A block with no
/// address lines yields an empty capture.
pub fn parse_ifconfig(output: &str, interface: &str) -> Option<InterfaceAddresses> {
    let mut found: Option<InterfaceAddresses> = None;
    let mut in_target = false;

    for line in output.lines() {
        if let Some(name) = header_name(line) {
            in_target = name == interface;
            if in_target && found.is_none() {
                found = Some(InterfaceAddresses::new());
            }
            continue;
        }
        if !in_target || !line.starts_with(char::is_whitespace) {
            continue;
        }
        if let (Some(addrs), Some(ip)) = (found.as_mut(), address_line(line)) {
            addrs.push(ip);
        }
    }

    found
}

#[async_trait]
impl AddressSource for IfconfigSource {
    async fn capture(&self, interface: &str) -> Result<Option<InterfaceAddresses>> {
        let output = self.run().await?;
        tracing::trace!("{} produced {} bytes", self.program, output.len());
        Ok(parse_ifconfig(&output, interface))
    }

    fn source_name(&self) -> &'static str {
        "ifconfig"
    }
}

/// Factory for creating ifconfig sources
pub struct IfconfigFactory;

impl AddressSourceFactory for IfconfigFactory {
    fn create(&self, config: &AddressSourceConfig) -> Result<Box<dyn AddressSource>> {
        match config {
            AddressSourceConfig::Ifconfig { program } => {
                Ok(Box::new(IfconfigSource::new(program.clone())))
            }
            _ => Err(Error::config("Invalid config for ifconfig address source")),
        }
    }
}

/// Register the ifconfig source with a registry
pub fn register(registry: &mut SourceRegistry) {
    registry.register_source("ifconfig", Box::new(IfconfigFactory));
}
