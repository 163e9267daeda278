//! Resource network: membership plus the cached energy aggregate.
//!
//! A `ResourceNetwork` owns the membership set for one network identity and
//! keeps a cached sum of the members' stored energy. The cache is always
//! recomputed from scratch under its own lock — never nudged incrementally —
//! so energy that vanished with an externally destroyed member can never
//! linger in the total.
//!
//! # Invariants
//!
//! - Identity and name are immutable for the network's lifetime.
//! - Membership is unique per `MemberId`; insertion order is irrelevant.
//! - The cached aggregate equals the sum of `stored_energy` over currently
//!   valid members as of the last recompute trigger (membership change,
//!   positive distribution, or an explicit recompute).
//! - Members are referenced, never owned: removal and cleanup only sever the
//!   membership relation.
//!
//! # Concurrency
//!
//! The membership set is a sharded concurrent map; the aggregate has its own
//! mutex so a recompute always sums against a whole snapshot of the map,
//! never a torn intermediate. Size queries racing a recompute may observe a
//! slightly newer membership than the reported sum — benign eventual
//! consistency, which is the documented tradeoff.

use crate::member::{MemberId, NetworkMember};
use crate::stats::{MemberInfo, NetworkOverview};
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Unique identity of a network, allocated at creation and never reused.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct NetworkId(pub Uuid);

impl NetworkId {
    /// Allocate a fresh identity.
    pub fn random() -> Self {
        NetworkId(Uuid::new_v4())
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named group of members sharing aggregated energy and participating in
/// item redistribution.
pub struct ResourceNetwork {
    id: NetworkId,
    name: String,
    members: DashMap<MemberId, Arc<dyn NetworkMember>>,
    /// Cached aggregate; its mutex is the single critical section for the
    /// one piece of compound state derived from the membership.
    total_energy: Mutex<u64>,
    /// Receiver-shuffle source for item distribution. Entropy-seeded by
    /// default; `with_seed` pins it for deterministic tests.
    rng: Mutex<SmallRng>,
}

impl ResourceNetwork {
    pub fn new(id: NetworkId, name: impl Into<String>) -> Self {
        Self::from_rng(id, name, SmallRng::from_entropy())
    }

    /// Network with a pinned shuffle seed (deterministic receiver order).
    pub fn with_seed(id: NetworkId, name: impl Into<String>, seed: u64) -> Self {
        Self::from_rng(id, name, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(id: NetworkId, name: impl Into<String>, rng: SmallRng) -> Self {
        Self {
            id,
            name: name.into(),
            members: DashMap::new(),
            total_energy: Mutex::new(0),
            rng: Mutex::new(rng),
        }
    }

    #[inline]
    pub fn id(&self) -> NetworkId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a member. Idempotent: a second add of the same identity changes
    /// nothing, and the aggregate is only recomputed on an actual insert.
    pub fn add_member(&self, member: Arc<dyn NetworkMember>) {
        use dashmap::mapref::entry::Entry;

        match self.members.entry(member.id()) {
            Entry::Occupied(_) => {}
            Entry::Vacant(vacant) => {
                debug!(network = %self.id, member = %member.id(), "member joined");
                vacant.insert(member);
                self.recompute_energy();
            }
        }
    }

    /// Remove a member; no-op if absent.
    pub fn remove_member(&self, id: MemberId) {
        if self.members.remove(&id).is_some() {
            debug!(network = %self.id, member = %id, "member left");
            self.recompute_energy();
        }
    }

    /// True if `id` is currently a member.
    #[inline]
    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains_key(&id)
    }

    /// Recompute the cached aggregate from the valid members.
    ///
    /// The full re-sum (rather than an incremental delta) is what heals the
    /// total when a member was destroyed without leaving.
    pub fn recompute_energy(&self) {
        let mut total = self.total_energy.lock();
        *total = self
            .members
            .iter()
            .filter(|entry| entry.value().is_valid())
            .map(|entry| entry.value().stored_energy())
            .sum();
    }

    /// Sum of stored energy across valid members (recomputes first).
    pub fn total_stored_energy(&self) -> u64 {
        self.recompute_energy();
        *self.total_energy.lock()
    }

    /// Sum of energy capacity across valid members.
    pub fn total_max_energy(&self) -> u64 {
        self.members
            .iter()
            .filter(|entry| entry.value().is_valid())
            .map(|entry| entry.value().max_energy())
            .sum()
    }

    /// Drop members whose host destroyed them, then recompute.
    ///
    /// Every read-oriented query calls this first ("clean on read"), so
    /// stale references self-heal without any proactive invalidation hook.
    pub fn cleanup(&self) {
        let before = self.members.len();
        self.members.retain(|_, member| member.is_valid());
        let dropped = before.saturating_sub(self.members.len());
        if dropped > 0 {
            debug!(network = %self.id, dropped, "cleanup dropped destroyed members");
        }
        self.recompute_energy();
    }

    /// Cleanup, then report whether the membership is empty. The directory
    /// uses this to decide reclamation.
    pub fn is_empty(&self) -> bool {
        self.cleanup();
        self.members.is_empty()
    }

    /// Cleanup, then count members.
    pub fn member_count(&self) -> usize {
        self.cleanup();
        self.members.len()
    }

    /// Cleanup, then snapshot the membership. Never exposes the live map.
    pub fn members(&self) -> Vec<Arc<dyn NetworkMember>> {
        self.cleanup();
        self.members
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Per-member display records, sorted by label. Unlabeled members show
    /// as "unnamed".
    pub fn member_infos(&self) -> Vec<MemberInfo> {
        self.cleanup();
        let mut infos: Vec<MemberInfo> = self
            .members
            .iter()
            .map(|entry| {
                let member = entry.value();
                let label = member.label();
                MemberInfo {
                    label: if label.is_empty() {
                        "unnamed".to_string()
                    } else {
                        label
                    },
                    stored_energy: member.stored_energy(),
                    max_energy: member.max_energy(),
                    mode: member.mode(),
                    has_items: member.has_items(),
                }
            })
            .collect();
        infos.sort_by(|a, b| a.label.cmp(&b.label));
        infos
    }

    /// Per-network rollup for the stats/UI boundary.
    pub fn overview(&self) -> NetworkOverview {
        NetworkOverview {
            id: self.id,
            name: self.name.clone(),
            member_count: self.member_count(),
            stored_energy: self.total_stored_energy(),
            max_energy: self.total_max_energy(),
        }
    }

    /// Snapshot of valid members excluding one identity — the common front
    /// half of every distribution walk.
    pub(crate) fn valid_members_excluding(&self, exclude: MemberId) -> Vec<Arc<dyn NetworkMember>> {
        self.members
            .iter()
            .filter(|entry| *entry.key() != exclude)
            .filter(|entry| entry.value().is_valid())
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Shuffle a candidate list with the network's RNG.
    pub(crate) fn shuffle<T>(&self, candidates: &mut [T]) {
        candidates.shuffle(&mut *self.rng.lock());
    }
}

impl fmt::Debug for ResourceNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceNetwork")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("members", &self.members.len())
            .finish()
    }
}
