//! Core member trait definitions.
//!
//! A member is an externally owned participant in a resource network. The
//! network references members through this trait and never manages their
//! lifetime: a member that has been destroyed by its host keeps its handle
//! alive but reports `is_valid() == false`, and the next cleanup pass drops
//! it from the membership.

use crate::item::ItemStack;
use crate::member::mode::TransferMode;
use std::fmt;
use thiserror::Error;

/// Compact identifier for a member.
///
/// Newtype over `u128`: cheap to compare and hash, with room enough that
/// hosts can derive it from whatever identity they already have. The
/// registry only requires it to be stable for the member's lifetime.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MemberId(pub u128);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Errors surfaced by a member's item container.
///
/// The item distribution walk treats any of these as "this member refused
/// the insert": the member is skipped and the walk continues with the next
/// candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    /// Slot index outside the container.
    #[error("slot {0} out of range")]
    SlotOutOfRange(usize),
    /// The container cannot answer right now (member mid-teardown, etc.).
    #[error("container unavailable: {0}")]
    Unavailable(String),
}

/// An externally owned participant in a resource network.
///
/// Implementations must be thread-safe: distribution walks run from many
/// callers at once, and every method takes `&self`. The amounts returned by
/// `insert_energy` / `extract_energy` are authoritative — a member may accept
/// or yield less than asked, and the network accounts only what the member
/// reports.
pub trait NetworkMember: Send + Sync {
    /// Stable identity for the member's lifetime.
    fn id(&self) -> MemberId;

    /// Human-readable label; may be empty.
    fn label(&self) -> String;

    /// False once the member has been externally destroyed.
    fn is_valid(&self) -> bool;

    /// Current transfer capability.
    fn mode(&self) -> TransferMode;

    /// Energy currently stored.
    fn stored_energy(&self) -> u64;

    /// Energy storage capacity.
    fn max_energy(&self) -> u64;

    /// Deposit up to `amount`; returns what was actually accepted.
    fn insert_energy(&self, amount: u64) -> u64;

    /// Withdraw up to `amount`; returns what was actually extracted.
    fn extract_energy(&self, amount: u64) -> u64;

    /// Number of item slots in the container.
    fn slot_count(&self) -> usize;

    /// Contents of one slot (`None` = empty slot).
    fn slot(&self, index: usize) -> Result<Option<ItemStack>, MemberError>;

    /// Replace the contents of one slot.
    fn set_slot(&self, index: usize, stack: Option<ItemStack>) -> Result<(), MemberError>;

    /// Fraction of energy capacity in use, in `[0, 1]`.
    ///
    /// Drives the greedy ordering in the distribution walks. Zero-capacity
    /// members report 0.
    fn fill_ratio(&self) -> f64 {
        let max = self.max_energy();
        if max == 0 {
            0.0
        } else {
            self.stored_energy() as f64 / max as f64
        }
    }

    /// True if any slot holds items. Slot errors count as "no items".
    fn has_items(&self) -> bool {
        (0..self.slot_count())
            .any(|i| matches!(self.slot(i), Ok(Some(stack)) if !stack.is_empty()))
    }
}
