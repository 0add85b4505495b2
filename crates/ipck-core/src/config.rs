//! Configuration types for ipck
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::{AddressScope, Protocol};

/// Configuration for a single check run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Interface to check (e.g., "eth0")
    pub interface: String,

    /// Directory holding one snapshot file per interface
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Protocol family whose primary address is selected
    #[serde(default = "default_protocol")]
    pub protocol: Protocol,

    /// IPv6 address scope considered for diffing and selection
    #[serde(default)]
    pub scope: AddressScope,

    /// Compute the result without persisting a new snapshot
    #[serde(default)]
    pub no_update: bool,

    /// Where addresses are captured from
    #[serde(default)]
    pub source: AddressSourceConfig,
}

impl CheckConfig {
    /// Create a configuration for `interface` with defaults
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            state_dir: default_state_dir(),
            protocol: default_protocol(),
            scope: AddressScope::default(),
            no_update: false,
            source: AddressSourceConfig::default(),
        }
    }

    /// Set the snapshot directory
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    /// Set the protocol family
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the IPv6 scope filter
    pub fn with_scope(mut self, scope: AddressScope) -> Self {
        self.scope = scope;
        self
    }

    /// Enable or disable read-only checking
    pub fn with_no_update(mut self, no_update: bool) -> Self {
        self.no_update = no_update;
        self
    }

    /// Set the address source
    pub fn with_source(mut self, source: AddressSourceConfig) -> Self {
        self.source = source;
        self
    }

    /// Scope filter actually applied for the configured protocol
    pub fn effective_scope(&self) -> AddressScope {
        self.scope.effective_for(self.protocol)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_interface_name(&self.interface)?;
        if self.state_dir.as_os_str().is_empty() {
            return Err(crate::Error::config("State directory cannot be empty"));
        }
        self.source.validate()?;
        Ok(())
    }
}

/// Check that `name` can be used as an interface name and as a file stem
///
/// The snapshot file is named after the interface, so anything that would
/// escape the state directory is refused.
pub fn validate_interface_name(name: &str) -> Result<(), crate::Error> {
    if name.is_empty() {
        return Err(crate::Error::config("Interface name cannot be empty"));
    }
    if name == "." || name == ".." {
        return Err(crate::Error::config(format!(
            "Interface name '{}' is not allowed",
            name
        )));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(crate::Error::config(format!(
            "Interface name '{}' contains a path separator",
            name.escape_default()
        )));
    }
    if Path::new(name).components().count() != 1 {
        return Err(crate::Error::config(format!(
            "Interface name '{}' is not a single path component",
            name
        )));
    }
    Ok(())
}

/// Address source configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AddressSourceConfig {
    /// Operating system interface table (getifaddrs)
    #[default]
    Ifaddrs,

    /// Parse the output of an `ifconfig` binary
    Ifconfig {
        /// Program to execute
        #[serde(default = "default_ifconfig_program")]
        program: String,
    },
}

impl AddressSourceConfig {
    /// Validate the address source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            AddressSourceConfig::Ifaddrs => Ok(()),
            AddressSourceConfig::Ifconfig { program } => {
                if program.trim().is_empty() {
                    return Err(crate::Error::config("ifconfig program cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Get the source type name used for registry lookup
    pub fn type_name(&self) -> &str {
        match self {
            AddressSourceConfig::Ifaddrs => "ifaddrs",
            AddressSourceConfig::Ifconfig { .. } => "ifconfig",
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_protocol() -> Protocol {
    Protocol::Inet6
}

pub fn default_ifconfig_program() -> String {
    "ifconfig".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckConfig::new("eth0");
        assert_eq!(config.protocol, Protocol::Inet6);
        assert_eq!(config.scope, AddressScope::Gua);
        assert_eq!(config.state_dir, PathBuf::from("."));
        assert!(!config.no_update);
        assert_eq!(config.source, AddressSourceConfig::Ifaddrs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_path_like_interface_names() {
        for name in ["", ".", "..", "../etc", "a/b", "a\\b", "eth\00"] {
            let err = CheckConfig::new(name).validate().unwrap_err();
            assert!(err.is_config(), "{name:?} should be rejected");
        }
        assert!(CheckConfig::new("eth0.100").validate().is_ok());
        assert!(CheckConfig::new("wlp2s0").validate().is_ok());
    }

    #[test]
    fn test_effective_scope_ignores_type_for_inet() {
        let config = CheckConfig::new("eth0")
            .with_protocol(Protocol::Inet)
            .with_scope(AddressScope::Ula);
        assert_eq!(config.effective_scope(), AddressScope::All);
    }

    #[test]
    fn test_ifconfig_program_required() {
        let source = AddressSourceConfig::Ifconfig {
            program: "  ".to_string(),
        };
        assert!(source.validate().is_err());
        assert_eq!(source.type_name(), "ifconfig");
    }

    #[test]
    fn test_source_config_deserialize() {
        let source: AddressSourceConfig =
            serde_json::from_str(r#"{"type": "ifconfig"}"#).unwrap();
        assert_eq!(
            source,
            AddressSourceConfig::Ifconfig {
                program: "ifconfig".to_string()
            }
        );
    }
}
