//! Transfer capability modes.
//!
//! Every member is in exactly one mode at a time. Modes gate eligibility for
//! the distribution walks by filtering, never by failing the operation: an
//! ineligible member simply drops out of the candidate list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transfer capability of a member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TransferMode {
    /// Supplies energy and items, never receives.
    SendOnly,
    /// Receives energy and items, never supplies.
    ReceiveOnly,
    /// Both supplies and receives.
    SendReceive,
}

impl TransferMode {
    /// True if a member in this mode may supply energy or items.
    #[inline]
    pub fn can_send(self) -> bool {
        matches!(self, TransferMode::SendOnly | TransferMode::SendReceive)
    }

    /// True if a member in this mode may receive energy or items.
    #[inline]
    pub fn can_receive(self) -> bool {
        matches!(self, TransferMode::ReceiveOnly | TransferMode::SendReceive)
    }

    /// Next mode in the fixed toggle rotation used by configuration UIs:
    /// SendReceive → SendOnly → ReceiveOnly → SendReceive.
    pub fn cycle(self) -> Self {
        match self {
            TransferMode::SendReceive => TransferMode::SendOnly,
            TransferMode::SendOnly => TransferMode::ReceiveOnly,
            TransferMode::ReceiveOnly => TransferMode::SendReceive,
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransferMode::SendOnly => "send-only",
            TransferMode::ReceiveOnly => "receive-only",
            TransferMode::SendReceive => "send-receive",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_predicates() {
        assert!(TransferMode::SendOnly.can_send());
        assert!(TransferMode::SendReceive.can_send());
        assert!(!TransferMode::ReceiveOnly.can_send());
    }

    #[test]
    fn test_receive_predicates() {
        assert!(TransferMode::ReceiveOnly.can_receive());
        assert!(TransferMode::SendReceive.can_receive());
        assert!(!TransferMode::SendOnly.can_receive());
    }

    #[test]
    fn test_cycle_visits_all_modes() {
        let start = TransferMode::SendReceive;
        let second = start.cycle();
        let third = second.cycle();

        assert_eq!(second, TransferMode::SendOnly);
        assert_eq!(third, TransferMode::ReceiveOnly);
        assert_eq!(third.cycle(), start);
    }
}
