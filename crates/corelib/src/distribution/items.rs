//! Best-effort item redistribution.
//!
//! # Algorithm
//!
//! 1. Snapshot the valid members, excluding the sender
//! 2. Keep members that can receive and have space for this kind (an empty
//!    slot, or a same-kind slot below its stack limit)
//! 3. Shuffle the candidates with the network's RNG — repeated sends must
//!    not always favor the same member, and no ordering holds between calls
//! 4. Per candidate: merge into compatible, non-full slots first, then let
//!    one empty slot take the whole remainder
//! 5. Stop as soon as the batch is fully placed; return the remainder
//!
//! A slot accessor error ends that member's attempt — whatever the member
//! already accepted stays accepted, the rest of the batch moves on to the
//! next candidate. The original batch comes back unchanged only when every
//! candidate refused.

use crate::item::ItemStack;
use crate::member::{MemberId, NetworkMember};
use crate::network::ResourceNetwork;
use tracing::trace;

impl ResourceNetwork {
    /// Distribute an item batch into the network; returns what could not be
    /// placed. An empty batch or a sender that is not a member comes back
    /// unchanged without touching any receiver.
    pub fn distribute_items(&self, sender: MemberId, batch: ItemStack) -> ItemStack {
        if batch.is_empty() || !self.contains(sender) {
            return batch;
        }

        let mut candidates: Vec<_> = self
            .valid_members_excluding(sender)
            .into_iter()
            .filter(|m| m.mode().can_receive())
            .filter(|m| has_space_for(m.as_ref(), &batch))
            .collect();

        if candidates.is_empty() {
            return batch;
        }
        self.shuffle(&mut candidates);

        let mut remaining = batch;
        for candidate in candidates {
            if remaining.is_empty() {
                break;
            }
            let before = remaining.count();
            remaining = insert_into_member(candidate.as_ref(), remaining);
            let placed = before - remaining.count();
            if placed > 0 {
                trace!(network = %self.id(), receiver = %candidate.id(), placed, "items placed");
            }
        }
        remaining
    }
}

/// Space probe: true if the member has an empty slot or a same-kind slot
/// below its stack limit. Slot errors read as "no space".
fn has_space_for(member: &dyn NetworkMember, batch: &ItemStack) -> bool {
    for index in 0..member.slot_count() {
        match member.slot(index) {
            Ok(None) => return true,
            Ok(Some(stack)) => {
                if stack.can_merge(batch) && stack.space_left() > 0 {
                    return true;
                }
            }
            Err(_) => return false,
        }
    }
    false
}

/// Two-pass insertion into one member: merge into compatible slots, then
/// drop the remainder into the first empty slot. Any slot error ends the
/// attempt with whatever is still unplaced.
fn insert_into_member(member: &dyn NetworkMember, batch: ItemStack) -> ItemStack {
    let mut remaining = batch;

    // merge pass
    for index in 0..member.slot_count() {
        if remaining.is_empty() {
            return remaining;
        }
        let slot = match member.slot(index) {
            Ok(slot) => slot,
            Err(_) => return remaining,
        };
        if let Some(mut stack) = slot {
            if !stack.can_merge(&remaining) {
                continue;
            }
            let take = stack.space_left().min(remaining.count());
            if take == 0 {
                continue;
            }
            stack.add(take);
            if member.set_slot(index, Some(stack)).is_err() {
                return remaining;
            }
            remaining.remove(take);
        }
    }

    // empty-slot pass: one slot takes the whole remainder
    for index in 0..member.slot_count() {
        if remaining.is_empty() {
            break;
        }
        match member.slot(index) {
            Ok(None) => {
                if member.set_slot(index, Some(remaining.clone())).is_err() {
                    return remaining;
                }
                remaining = remaining.emptied();
                break;
            }
            Ok(Some(_)) => {}
            Err(_) => return remaining,
        }
    }

    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use crate::member::{MemberId, SimMember};

    fn pebbles() -> ItemKind {
        ItemKind::new("pebble", 16)
    }

    #[test]
    fn test_merge_pass_tops_up_existing_stack() {
        let member = SimMember::with_slot_count(MemberId(1), "m", 0, 2);
        member
            .set_slot(0, Some(ItemStack::new(pebbles(), 10)))
            .unwrap();

        let leftover = insert_into_member(&member, ItemStack::new(pebbles(), 4));
        assert!(leftover.is_empty());
        assert_eq!(member.slot(0).unwrap().unwrap().count(), 14);
        assert_eq!(member.slot(1).unwrap(), None);
    }

    #[test]
    fn test_empty_slot_takes_remainder_after_merge() {
        let member = SimMember::with_slot_count(MemberId(1), "m", 0, 2);
        member
            .set_slot(0, Some(ItemStack::new(pebbles(), 15)))
            .unwrap();

        let leftover = insert_into_member(&member, ItemStack::new(pebbles(), 5));
        assert!(leftover.is_empty());
        assert_eq!(member.slot(0).unwrap().unwrap().count(), 16);
        assert_eq!(member.slot(1).unwrap().unwrap().count(), 4);
    }

    #[test]
    fn test_full_member_returns_batch() {
        let member = SimMember::with_slot_count(MemberId(1), "m", 0, 1);
        member
            .set_slot(0, Some(ItemStack::new(pebbles(), 16)))
            .unwrap();

        assert!(!has_space_for(&member, &ItemStack::new(pebbles(), 1)));
        let leftover = insert_into_member(&member, ItemStack::new(pebbles(), 3));
        assert_eq!(leftover.count(), 3);
    }

    #[test]
    fn test_different_kind_does_not_merge() {
        let member = SimMember::with_slot_count(MemberId(1), "m", 0, 1);
        member
            .set_slot(0, Some(ItemStack::new(pebbles(), 1)))
            .unwrap();

        let shard = ItemStack::new(ItemKind::new("shard", 16), 2);
        assert!(!has_space_for(&member, &shard));
        let leftover = insert_into_member(&member, shard);
        assert_eq!(leftover.count(), 2);
    }

    #[test]
    fn test_destroyed_member_reads_as_no_space() {
        let member = SimMember::new(MemberId(1), "m", 0);
        member.invalidate();
        assert!(!has_space_for(&member, &ItemStack::new(pebbles(), 1)));
    }
}
