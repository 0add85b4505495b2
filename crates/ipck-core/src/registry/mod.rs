//! Plugin-based address source registry
//!
//! Address source crates register a factory under a type name; the binary
//! then builds whichever source the configuration names, without a
//! hard-coded match over every implementation.
//!
//! ## Registration
//!
//! ```rust,ignore
//! // In ipck-source-ifaddrs
//! pub fn register(registry: &mut SourceRegistry) {
//!     registry.register_source("ifaddrs", Box::new(IfaddrsFactory));
//! }
//! ```

use crate::config::AddressSourceConfig;
use crate::error::{Error, Result};
use crate::traits::{AddressSource, AddressSourceFactory};
use std::collections::BTreeMap;

/// Registry mapping source type names to factories
#[derive(Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Box<dyn AddressSourceFactory>>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an address source factory
    ///
    /// # Parameters
    ///
    /// - `name`: Source type name (e.g., "ifaddrs", "ifconfig")
    /// - `factory`: Factory object for creating source instances
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_source(
        &mut self,
        name: impl Into<String>,
        factory: Box<dyn AddressSourceFactory>,
    ) {
        self.sources.insert(name.into(), factory);
    }

    /// Create an address source from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn AddressSource>)`: Created source instance
    /// - `Err(Error)`: If the source type is not registered or creation fails
    pub fn create_source(&self, config: &AddressSourceConfig) -> Result<Box<dyn AddressSource>> {
        let source_type = config.type_name();
        let factory = self.sources.get(source_type).ok_or_else(|| {
            Error::config(format!(
                "Unknown address source type: {} (registered: {})",
                source_type,
                self.list_sources().join(", ")
            ))
        })?;

        factory.create(config)
    }

    /// List all registered source types, sorted
    pub fn list_sources(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    /// Check if a source type is registered
    pub fn has_source(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticAddressSource;

    struct StaticFactory;

    impl AddressSourceFactory for StaticFactory {
        fn create(&self, _config: &AddressSourceConfig) -> Result<Box<dyn AddressSource>> {
            Ok(Box::new(StaticAddressSource::new()))
        }
    }

    #[test]
    fn test_registry_registration() {
        let mut registry = SourceRegistry::new();

        // Initially empty
        assert!(!registry.has_source("ifaddrs"));

        registry.register_source("ifaddrs", Box::new(StaticFactory));

        assert!(registry.has_source("ifaddrs"));
        assert_eq!(registry.list_sources(), vec!["ifaddrs".to_string()]);
    }

    #[test]
    fn test_create_source() {
        let mut registry = SourceRegistry::new();
        registry.register_source("ifaddrs", Box::new(StaticFactory));

        let source = registry.create_source(&AddressSourceConfig::Ifaddrs).unwrap();
        assert_eq!(source.source_name(), "static");
    }

    #[test]
    fn test_unknown_source_is_config_error() {
        let registry = SourceRegistry::new();
        let config = AddressSourceConfig::Ifconfig {
            program: "ifconfig".to_string(),
        };
        let err = registry.create_source(&config).err().unwrap();
        assert!(err.is_config());
    }
}
