use clap::{Parser, ValueEnum};
use ipck_core::{AddressScope, AddressSourceConfig, CheckConfig, OutputMode, Protocol};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ipck")]
#[command(about = "Report address changes on an interface and estimate its stable address")]
#[command(version)]
pub struct Cli {
    /// Interface to check (e.g. eth0)
    pub ifname: String,

    /// Directory holding the per-interface snapshot files
    #[arg(short = 'd', long = "dir", env = "IPCK_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Protocol family to select a primary address for
    #[arg(short = 'f', long = "family", value_enum, default_value_t = Family::Inet6)]
    pub family: Family,

    /// IPv6 address type considered (ignored for inet)
    #[arg(short = 't', long = "type", value_enum, default_value_t = AddressType::Gua)]
    pub address_type: AddressType,

    /// Do not write a new snapshot
    #[arg(short = 'n', long = "noupdate", default_value_t = false)]
    pub no_update: bool,

    /// Print only the primary address (takes precedence over --bool)
    #[arg(short = 's', long, default_value_t = false)]
    pub simple: bool,

    /// Print only whether anything changed
    #[arg(short = 'b', long = "bool", default_value_t = false)]
    pub changed_only: bool,

    /// How addresses are captured
    #[arg(long, value_enum, env = "IPCK_SOURCE", default_value_t = SourceKind::Ifaddrs)]
    pub source: SourceKind,

    /// ifconfig binary used by the ifconfig source
    #[arg(long = "ifconfig-path", default_value = "ifconfig")]
    pub ifconfig_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Family {
    Inet,
    Inet6,
}

impl From<Family> for Protocol {
    fn from(family: Family) -> Self {
        match family {
            Family::Inet => Protocol::Inet,
            Family::Inet6 => Protocol::Inet6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AddressType {
    Gua,
    Ula,
}

impl From<AddressType> for AddressScope {
    fn from(kind: AddressType) -> Self {
        match kind {
            AddressType::Gua => AddressScope::Gua,
            AddressType::Ula => AddressScope::Ula,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Ifaddrs,
    Ifconfig,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.simple {
            OutputMode::Simple
        } else if self.changed_only {
            OutputMode::Bool
        } else {
            OutputMode::Full
        }
    }

    pub fn source_config(&self) -> AddressSourceConfig {
        match self.source {
            SourceKind::Ifaddrs => AddressSourceConfig::Ifaddrs,
            SourceKind::Ifconfig => AddressSourceConfig::Ifconfig {
                program: self.ifconfig_path.clone(),
            },
        }
    }

    /// Build the library configuration for this invocation
    pub fn check_config(&self) -> CheckConfig {
        CheckConfig::new(self.ifname.clone())
            .with_state_dir(self.dir.clone())
            .with_protocol(self.family.into())
            .with_scope(self.address_type.into())
            .with_no_update(self.no_update)
            .with_source(self.source_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ipck").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["eth0"]).unwrap();
        let config = cli.check_config();
        assert_eq!(config.interface, "eth0");
        assert_eq!(config.protocol, Protocol::Inet6);
        assert_eq!(config.scope, AddressScope::Gua);
        assert!(!config.no_update);
        assert_eq!(cli.output_mode(), OutputMode::Full);
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-d", "/tmp/ipck", "-f", "inet", "-t", "ula", "-n", "-s", "wlan0"]).unwrap();
        let config = cli.check_config();
        assert_eq!(config.state_dir, PathBuf::from("/tmp/ipck"));
        assert_eq!(config.protocol, Protocol::Inet);
        assert_eq!(config.scope, AddressScope::Ula);
        assert!(config.no_update);
        assert_eq!(cli.output_mode(), OutputMode::Simple);
    }

    #[test]
    fn test_bool_output() {
        let cli = parse(&["--bool", "eth0"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Bool);
    }

    #[test]
    fn test_simple_wins_over_bool() {
        let cli = parse(&["-s", "-b", "eth0"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Simple);

        let cli = parse(&["--bool", "--simple", "eth0"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Simple);
    }

    #[test]
    fn test_rejects_unknown_family() {
        assert!(parse(&["-f", "ipx", "eth0"]).is_err());
        assert!(parse(&["-t", "lla", "eth0"]).is_err());
    }

    #[test]
    fn test_interface_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_ifconfig_source() {
        let cli = parse(&["--source", "ifconfig", "--ifconfig-path", "/sbin/ifconfig", "en0"]).unwrap();
        assert_eq!(
            cli.source_config(),
            AddressSourceConfig::Ifconfig {
                program: "/sbin/ifconfig".to_string()
            }
        );
    }
}
