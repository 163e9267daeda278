//! The process-wide network directory.
//!
//! One `NetworkDirectory` instance is owned by the host's session lifecycle
//! and passed explicitly to every collaborator — there is no ambient global
//! state. The directory exclusively owns the lifetime of its
//! `ResourceNetwork` instances: a network never outlives its removal from
//! the maps.
//!
//! # Concurrency
//!
//! Both maps are sharded concurrent maps; all reads are lock-free from the
//! caller's point of view. `resolve_or_create` is the only operation that
//! must be exactly-once per name under races, and it wins that through the
//! name index's entry API: the first caller to take the name's shard
//! constructs the network, every later caller sees the same identity.
//! A caller may observe a network that a concurrent `remove_member` just
//! reclaimed; directory operations on such an identity are no-ops by
//! design, and callers are expected to tolerate them.

use corelib::member::{MemberId, NetworkMember};
use corelib::network::{NetworkId, ResourceNetwork};
use corelib::stats::NetworkOverview;
use dashmap::DashMap;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info};

/// Process-wide map from network identity to live network, plus the unique
/// name index.
#[derive(Default)]
pub struct NetworkDirectory {
    pub(crate) networks: DashMap<NetworkId, Arc<ResourceNetwork>>,
    pub(crate) by_name: DashMap<String, NetworkId>,
}

impl NetworkDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a name to its network identity, creating the network if the
    /// name is unknown. Exactly one network is ever constructed per name,
    /// no matter how many callers race here.
    pub fn resolve_or_create(&self, name: &str) -> NetworkId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        *self
            .by_name
            .entry(name.to_string())
            .or_insert_with(|| {
                let id = NetworkId::random();
                self.networks
                    .insert(id, Arc::new(ResourceNetwork::new(id, name)));
                info!(network = %id, name, "created network");
                id
            })
    }

    /// Lifecycle hook: resolve (or create) the named network and join it.
    /// Returns the identity the member should present when leaving.
    pub fn join_network(&self, name: &str, member: Arc<dyn NetworkMember>) -> NetworkId {
        let id = self.resolve_or_create(name);
        self.add_member(id, member);
        id
    }

    /// Lifecycle hook: leave a network, reclaiming it if it became empty.
    pub fn leave_network(&self, id: NetworkId, member: MemberId) {
        self.remove_member(id, member);
    }

    /// Delegate an add to the identified network; no-op for an unknown
    /// identity.
    pub fn add_member(&self, id: NetworkId, member: Arc<dyn NetworkMember>) {
        if let Some(network) = self.networks.get(&id) {
            network.add_member(member);
        }
    }

    /// Delegate a removal; if the network emptied, reclaim it from both
    /// maps. No-op for an unknown identity.
    pub fn remove_member(&self, id: NetworkId, member: MemberId) {
        let emptied = match self.networks.get(&id) {
            Some(network) => {
                network.remove_member(member);
                network.is_empty()
            }
            None => return,
        };
        if emptied {
            self.reclaim(id);
        }
    }

    /// Remove the network if it is still empty. Emptiness is re-checked
    /// under the map's shard lock so a join racing the reclaim keeps the
    /// network alive.
    fn reclaim(&self, id: NetworkId) {
        if let Some((_, network)) = self.networks.remove_if(&id, |_, n| n.is_empty()) {
            self.by_name.retain(|_, mapped| *mapped != id);
            info!(network = %id, name = network.name(), "reclaimed empty network");
        }
    }

    /// Pure read by identity.
    pub fn lookup(&self, id: NetworkId) -> Option<Arc<ResourceNetwork>> {
        self.networks.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Pure read by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<Arc<ResourceNetwork>> {
        let id = *self.by_name.get(name)?;
        self.lookup(id)
    }

    /// Snapshot of the live networks; never the internal map.
    pub fn networks(&self) -> Vec<Arc<ResourceNetwork>> {
        self.networks
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Snapshot of the known names.
    pub fn network_names(&self) -> Vec<String> {
        self.by_name.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    /// Per-network stats snapshot for the UI boundary; `None` for an
    /// unknown or reclaimed identity.
    pub fn network_stats(&self, id: NetworkId) -> Option<NetworkOverview> {
        self.lookup(id).map(|network| network.overview())
    }

    /// Global totals across all networks.
    ///
    /// Each per-network figure is that network's own self-consistent
    /// aggregate, so the global sum is eventually consistent across
    /// independently locked networks — fine for monitoring, not a basis
    /// for distribution decisions.
    pub fn statistics(&self) -> DirectoryStats {
        let networks = self.networks();
        let mut stats = DirectoryStats {
            network_count: networks.len(),
            ..DirectoryStats::default()
        };
        for network in networks {
            stats.member_count += network.member_count();
            stats.total_stored_energy += network.total_stored_energy();
            stats.total_max_energy += network.total_max_energy();
        }
        stats
    }

    /// Periodic sweep: drop every network that reports empty, keeping the
    /// name index consistent. Returns how many were reclaimed.
    pub fn prune_empty(&self) -> usize {
        let empty: Vec<NetworkId> = self
            .networks
            .iter()
            .filter(|entry| entry.value().is_empty())
            .map(|entry| *entry.key())
            .collect();

        let mut removed = 0;
        for id in empty {
            if self.networks.remove_if(&id, |_, n| n.is_empty()).is_some() {
                self.by_name.retain(|_, mapped| *mapped != id);
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "pruned empty networks");
        }
        removed
    }

    /// Multi-line debug report: global stats, then every network with its
    /// members.
    pub fn debug_dump(&self) -> String {
        let stats = self.statistics();
        let mut out = String::new();
        out.push_str("=== Resource Mesh Debug Info ===\n");
        let _ = writeln!(out, "Total Networks: {}", stats.network_count);
        let _ = writeln!(out, "Total Members: {}", stats.member_count);
        let _ = writeln!(
            out,
            "Total Energy: {} / {} ({:.1}%)",
            stats.total_stored_energy,
            stats.total_max_energy,
            stats.fill_percent()
        );
        out.push('\n');

        let mut networks = self.networks();
        networks.sort_by(|a, b| a.name().cmp(b.name()));
        for network in networks {
            let overview = network.overview();
            let id_text = network.id().to_string();
            let _ = writeln!(
                out,
                "Network: {} (ID: {})",
                overview.name,
                &id_text[..8.min(id_text.len())]
            );
            let _ = writeln!(out, "  Members: {}", overview.member_count);
            let _ = writeln!(
                out,
                "  Energy: {} / {} ({:.1}%)",
                overview.stored_energy,
                overview.max_energy,
                overview.fill_percent()
            );
            for info in network.member_infos() {
                let _ = writeln!(
                    out,
                    "    - {} [{}] ({:.1}% energy){}",
                    info.label,
                    info.mode,
                    info.fill_percent(),
                    if info.has_items { " *items*" } else { "" }
                );
            }
            out.push('\n');
        }
        out
    }
}

/// Global totals for monitoring and debug output.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct DirectoryStats {
    pub network_count: usize,
    pub member_count: usize,
    pub total_stored_energy: u64,
    pub total_max_energy: u64,
}

impl DirectoryStats {
    /// Global energy fill as a percentage; 0 when nothing has capacity.
    pub fn fill_percent(&self) -> f64 {
        if self.total_max_energy == 0 {
            0.0
        } else {
            self.total_stored_energy as f64 / self.total_max_energy as f64 * 100.0
        }
    }
}
