//! Process-wide network registry.
//!
//! This crate provides the directory that maps network names and identities
//! to live `ResourceNetwork` instances:
//! - Atomic name → identity resolution (single winner under races)
//! - Member join/leave with empty-network reclamation
//! - Snapshot (de)serialization for the host's persistence layer
//! - Global statistics and the debug dump

pub mod directory;
pub mod error;
pub mod snapshot;

pub use directory::{DirectoryStats, NetworkDirectory};
pub use error::DirectoryError;
pub use snapshot::NetworkRecord;
