//! Check results and their text rendering

use serde::Serialize;
use std::fmt::Write as _;

use crate::diff::AddressDiff;
use crate::model::{AddressScope, Protocol};

/// How a report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Every list, the primary and the change flag, one item per line
    #[default]
    Full,
    /// Only the primary address, or nothing
    Simple,
    /// Only the change flag
    Bool,
}

/// Outcome of one check, as shown to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub interface: String,
    pub protocol: Protocol,
    pub scope: AddressScope,
    /// Sorted lists of the scope-filtered diff
    pub appeared: Vec<String>,
    pub remained: Vec<String>,
    pub gone: Vec<String>,
    /// Estimated stable address for `protocol`
    pub primary: Option<String>,
    /// Whether any address appeared or disappeared
    pub changed: bool,
}

impl CheckReport {
    pub(crate) fn new(
        interface: &str,
        protocol: Protocol,
        scope: AddressScope,
        diff: AddressDiff,
        primary: Option<String>,
        changed: bool,
    ) -> Self {
        Self {
            interface: interface.to_string(),
            protocol,
            scope,
            appeared: diff.appeared.into_iter().collect(),
            remained: diff.remained.into_iter().collect(),
            gone: diff.gone.into_iter().collect(),
            primary,
            changed,
        }
    }

    /// Render the report for printing to stdout
    pub fn render(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Simple => match &self.primary {
                Some(primary) => format!("{}\n", primary),
                None => String::new(),
            },
            OutputMode::Bool => format!("{}\n", self.changed),
            OutputMode::Full => {
                let mut out = String::new();
                for (label, list) in [
                    ("appeared", &self.appeared),
                    ("remained", &self.remained),
                    ("gone", &self.gone),
                ] {
                    let _ = writeln!(out, "{}:", label);
                    for addr in list {
                        let _ = writeln!(out, "  {}", addr);
                    }
                }
                let _ = writeln!(
                    out,
                    "primary: {}",
                    self.primary.as_deref().unwrap_or("(none)")
                );
                let _ = writeln!(out, "changed: {}", self.changed);
                out
            }
        }
    }
}
