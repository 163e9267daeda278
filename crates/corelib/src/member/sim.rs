//! In-memory member implementation.
//!
//! `SimMember` backs the test suites and the CLI simulation. Hosts embed
//! their real participants behind the same `NetworkMember` trait.

use crate::item::ItemStack;
use crate::member::mode::TransferMode;
use crate::member::traits::{MemberError, MemberId, NetworkMember};
use parking_lot::RwLock;

/// Default container size (3×3 grid).
pub const DEFAULT_SLOT_COUNT: usize = 9;

/// In-memory member with interior mutability.
///
/// Shared as `Arc<SimMember>`; all mutation goes through one RwLock so
/// concurrent distribution walks observe whole slots, never torn ones.
pub struct SimMember {
    id: MemberId,
    label: String,
    state: RwLock<SimState>,
}

struct SimState {
    mode: TransferMode,
    stored: u64,
    max: u64,
    slots: Vec<Option<ItemStack>>,
    valid: bool,
}

impl SimMember {
    /// New member with empty storage, `SendReceive` mode and the default
    /// slot count.
    pub fn new(id: MemberId, label: impl Into<String>, max_energy: u64) -> Self {
        Self::with_slot_count(id, label, max_energy, DEFAULT_SLOT_COUNT)
    }

    pub fn with_slot_count(
        id: MemberId,
        label: impl Into<String>,
        max_energy: u64,
        slot_count: usize,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            state: RwLock::new(SimState {
                mode: TransferMode::SendReceive,
                stored: 0,
                max: max_energy,
                slots: vec![None; slot_count],
                valid: true,
            }),
        }
    }

    pub fn set_mode(&self, mode: TransferMode) {
        self.state.write().mode = mode;
    }

    /// Advance to the next mode in the toggle rotation; returns the new mode.
    pub fn cycle_mode(&self) -> TransferMode {
        let mut state = self.state.write();
        state.mode = state.mode.cycle();
        state.mode
    }

    /// Set the stored energy directly, clamped to capacity.
    pub fn set_stored_energy(&self, amount: u64) {
        let mut state = self.state.write();
        state.stored = amount.min(state.max);
    }

    /// Mark the member as externally destroyed. Cleanup passes drop it from
    /// any network it joined.
    pub fn invalidate(&self) {
        self.state.write().valid = false;
    }
}

impl NetworkMember for SimMember {
    fn id(&self) -> MemberId {
        self.id
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn is_valid(&self) -> bool {
        self.state.read().valid
    }

    fn mode(&self) -> TransferMode {
        self.state.read().mode
    }

    fn stored_energy(&self) -> u64 {
        self.state.read().stored
    }

    fn max_energy(&self) -> u64 {
        self.state.read().max
    }

    fn insert_energy(&self, amount: u64) -> u64 {
        let mut state = self.state.write();
        if !state.valid {
            return 0;
        }
        let accepted = amount.min(state.max - state.stored);
        state.stored += accepted;
        accepted
    }

    fn extract_energy(&self, amount: u64) -> u64 {
        let mut state = self.state.write();
        if !state.valid {
            return 0;
        }
        let extracted = amount.min(state.stored);
        state.stored -= extracted;
        extracted
    }

    fn slot_count(&self) -> usize {
        self.state.read().slots.len()
    }

    fn slot(&self, index: usize) -> Result<Option<ItemStack>, MemberError> {
        let state = self.state.read();
        if !state.valid {
            return Err(MemberError::Unavailable("member destroyed".into()));
        }
        state
            .slots
            .get(index)
            .cloned()
            .ok_or(MemberError::SlotOutOfRange(index))
    }

    fn set_slot(&self, index: usize, stack: Option<ItemStack>) -> Result<(), MemberError> {
        let mut state = self.state.write();
        if !state.valid {
            return Err(MemberError::Unavailable("member destroyed".into()));
        }
        let slot = state
            .slots
            .get_mut(index)
            .ok_or(MemberError::SlotOutOfRange(index))?;
        // normalize: zero-count stacks are stored as empty slots
        *slot = stack.filter(|s| !s.is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    #[test]
    fn test_energy_clamped_to_capacity() {
        let member = SimMember::new(MemberId(1), "m1", 100);
        assert_eq!(member.insert_energy(150), 100);
        assert_eq!(member.stored_energy(), 100);
        assert_eq!(member.insert_energy(1), 0);
    }

    #[test]
    fn test_extract_bounded_by_stored() {
        let member = SimMember::new(MemberId(1), "m1", 100);
        member.set_stored_energy(40);
        assert_eq!(member.extract_energy(100), 40);
        assert_eq!(member.stored_energy(), 0);
    }

    #[test]
    fn test_invalid_member_refuses_everything() {
        let member = SimMember::new(MemberId(1), "m1", 100);
        member.invalidate();
        assert!(!member.is_valid());
        assert_eq!(member.insert_energy(10), 0);
        assert!(member.slot(0).is_err());
        assert!(member.set_slot(0, None).is_err());
    }

    #[test]
    fn test_slot_out_of_range() {
        let member = SimMember::with_slot_count(MemberId(1), "m1", 0, 2);
        assert_eq!(member.slot(5), Err(MemberError::SlotOutOfRange(5)));
    }

    #[test]
    fn test_zero_count_stack_stored_as_empty() {
        let member = SimMember::new(MemberId(1), "m1", 0);
        let kind = ItemKind::new("pebble", 16);
        member
            .set_slot(0, Some(ItemStack::new(kind, 0)))
            .unwrap();
        assert_eq!(member.slot(0).unwrap(), None);
        assert!(!member.has_items());
    }

    #[test]
    fn test_cycle_mode_round_trip() {
        let member = SimMember::new(MemberId(1), "m1", 0);
        assert_eq!(member.cycle_mode(), TransferMode::SendOnly);
        assert_eq!(member.cycle_mode(), TransferMode::ReceiveOnly);
        assert_eq!(member.cycle_mode(), TransferMode::SendReceive);
    }
}
