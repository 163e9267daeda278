//! Energy push/pull walks.
//!
//! # Algorithm
//!
//! 1. Snapshot the valid members, excluding the caller
//! 2. Filter by capability mode and headroom (push) or stock (pull)
//! 3. Stable-sort by fill ratio — ascending for push, descending for pull;
//!    ties keep snapshot order
//! 4. Walk greedily, offering `min(remaining, member headroom/stock)`; the
//!    amount the member actually accepts or yields is authoritative
//! 5. Stop when nothing remains or the list is exhausted; recompute the
//!    aggregate if anything moved
//!
//! # Performance
//!
//! - **Time**: O(n log n) for the sort, O(n) for the walk
//! - **Space**: O(n) membership snapshot
//!
//! "Insufficient receivers" and "no eligible suppliers" are ordinary
//! outcomes encoded as a zero return, never errors.

use crate::member::MemberId;
use crate::network::ResourceNetwork;
use std::cmp::Ordering;
use tracing::trace;

impl ResourceNetwork {
    /// Push `amount` of the sender's energy into the network.
    ///
    /// Receivers are members that can receive and still have headroom,
    /// filled lowest-fill-ratio first.
    ///
    /// # Returns
    /// The amount actually distributed (`<= amount`); 0 when `amount` is 0,
    /// the sender is not a member, or no receiver is eligible.
    pub fn distribute_energy(&self, sender: MemberId, amount: u64) -> u64 {
        if amount == 0 || !self.contains(sender) {
            return 0;
        }

        let mut receivers: Vec<_> = self
            .valid_members_excluding(sender)
            .into_iter()
            .filter(|m| m.mode().can_receive())
            .filter(|m| m.stored_energy() < m.max_energy())
            .collect();
        receivers.sort_by(|a, b| {
            a.fill_ratio()
                .partial_cmp(&b.fill_ratio())
                .unwrap_or(Ordering::Equal)
        });

        if receivers.is_empty() {
            return 0;
        }

        let mut remaining = amount;
        let mut distributed = 0u64;

        for receiver in receivers {
            if remaining == 0 {
                break;
            }
            let headroom = receiver.max_energy().saturating_sub(receiver.stored_energy());
            let offer = remaining.min(headroom);
            if offer == 0 {
                continue;
            }
            let accepted = receiver.insert_energy(offer);
            trace!(network = %self.id(), receiver = %receiver.id(), offer, accepted, "energy pushed");
            distributed += accepted;
            remaining = remaining.saturating_sub(accepted);
        }

        if distributed > 0 {
            self.recompute_energy();
        }
        distributed
    }

    /// Pull up to `amount` of energy from the network for the requester.
    ///
    /// Suppliers are members that can send and hold any energy, drained
    /// highest-fill-ratio first.
    ///
    /// # Returns
    /// The amount actually received (`<= amount`); 0 when `amount` is 0,
    /// the requester is not a member, or no supplier is eligible.
    pub fn request_energy(&self, requester: MemberId, amount: u64) -> u64 {
        if amount == 0 || !self.contains(requester) {
            return 0;
        }

        let mut suppliers: Vec<_> = self
            .valid_members_excluding(requester)
            .into_iter()
            .filter(|m| m.mode().can_send())
            .filter(|m| m.stored_energy() > 0)
            .collect();
        suppliers.sort_by(|a, b| {
            b.fill_ratio()
                .partial_cmp(&a.fill_ratio())
                .unwrap_or(Ordering::Equal)
        });

        if suppliers.is_empty() {
            return 0;
        }

        let mut remaining = amount;
        let mut received = 0u64;

        for supplier in suppliers {
            if remaining == 0 {
                break;
            }
            let ask = remaining.min(supplier.stored_energy());
            if ask == 0 {
                continue;
            }
            let extracted = supplier.extract_energy(ask);
            trace!(network = %self.id(), supplier = %supplier.id(), ask, extracted, "energy pulled");
            received += extracted;
            remaining = remaining.saturating_sub(extracted);
        }

        if received > 0 {
            self.recompute_energy();
        }
        received
    }
}
