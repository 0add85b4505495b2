// # ipck-core
//
// Core library for tracking the addresses of a network interface across runs
// and estimating one stable ("primary") address per protocol family.
//
// ## Architecture Overview
//
// - **AddressSource**: Trait for capturing an interface's current addresses
// - **SnapshotStore**: Trait for persisting the per-interface snapshot
// - **AddressDiff**: Appeared / remained / gone classification between runs
// - **select_primary**: Stability-first primary address selection
// - **CheckEngine**: Runs one capture → diff → select → save cycle
// - **SourceRegistry**: Plugin-based registry for address sources
//
// ## Design Principles
//
// 1. **Run-to-completion**: One invocation is one check; scheduling is external
// 2. **Snapshot as memory**: The persisted snapshot is the only state between runs
// 3. **Pure core**: Diffing and selection are total functions over their inputs
// 4. **Stability over freshness**: A primary that is still present is never swapped
// 5. **Library-First**: The binary is thin glue over this crate

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod model;
pub mod registry;
pub mod report;
pub mod select;
pub mod source;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{AddressSourceConfig, CheckConfig};
pub use diff::AddressDiff;
pub use engine::{CheckEngine, CheckOutcome};
pub use error::{Error, Result};
pub use model::{AddressScope, InterfaceAddresses, InterfaceRecord, Protocol, Snapshot};
pub use registry::SourceRegistry;
pub use report::{CheckReport, OutputMode};
pub use select::{PrimarySelection, SelectionOutcome, select_primary};
pub use source::StaticAddressSource;
pub use state::{FileSnapshotStore, MemorySnapshotStore};
pub use traits::{AddressSource, AddressSourceFactory, SnapshotStore};
