//! Per-network statistics snapshots.
//!
//! Owned records handed across the stats/UI boundary; never views into live
//! state.

use crate::member::TransferMode;
use crate::network::NetworkId;
use serde::Serialize;

/// Snapshot of a single member for display layers.
#[derive(Clone, Debug, Serialize)]
pub struct MemberInfo {
    pub label: String,
    pub stored_energy: u64,
    pub max_energy: u64,
    pub mode: TransferMode,
    pub has_items: bool,
}

impl MemberInfo {
    /// Energy fill as a percentage; zero-capacity members report 0.
    pub fn fill_percent(&self) -> f64 {
        if self.max_energy == 0 {
            0.0
        } else {
            self.stored_energy as f64 / self.max_energy as f64 * 100.0
        }
    }
}

/// Per-network rollup.
#[derive(Clone, Debug, Serialize)]
pub struct NetworkOverview {
    pub id: NetworkId,
    pub name: String,
    pub member_count: usize,
    pub stored_energy: u64,
    pub max_energy: u64,
}

impl NetworkOverview {
    pub fn fill_percent(&self) -> f64 {
        if self.max_energy == 0 {
            0.0
        } else {
            self.stored_energy as f64 / self.max_energy as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_percent_zero_capacity() {
        let info = MemberInfo {
            label: "m".into(),
            stored_energy: 0,
            max_energy: 0,
            mode: TransferMode::SendReceive,
            has_items: false,
        };
        assert_eq!(info.fill_percent(), 0.0);
    }

    #[test]
    fn test_fill_percent() {
        let overview = NetworkOverview {
            id: NetworkId::random(),
            name: "n".into(),
            member_count: 1,
            stored_energy: 25,
            max_energy: 100,
        };
        assert!((overview.fill_percent() - 25.0).abs() < f64::EPSILON);
    }
}
