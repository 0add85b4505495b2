//! Core traits for ipck
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`AddressSource`]: Capture the addresses currently bound to an interface
//! - [`SnapshotStore`]: Load and persist per-interface snapshots

pub mod address_source;
pub mod snapshot_store;

pub use address_source::{AddressSource, AddressSourceFactory};
pub use snapshot_store::SnapshotStore;
