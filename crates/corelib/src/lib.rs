//! Core library for the resource mesh.
//!
//! This crate provides the fundamental abstractions for resource sharing:
//! - Member identity, capability modes, and the `NetworkMember` trait
//! - Item kinds and stacks
//! - `ResourceNetwork`: membership, the cached energy aggregate, and the
//!   energy/item distribution walks
//! - Per-network statistics snapshots

pub mod distribution;
pub mod item;
pub mod member;
pub mod network;
pub mod stats;

pub use item::{ItemKind, ItemStack};
pub use member::{MemberError, MemberId, NetworkMember, SimMember, TransferMode};
pub use network::{NetworkId, ResourceNetwork};
pub use stats::{MemberInfo, NetworkOverview};
