//! Comprehensive tests for the network directory.
//!
//! # Test Strategy
//!
//! 1. **Resolution**: get-or-create semantics, racing creators
//! 2. **Lifecycle**: join/leave, reclamation of emptied networks
//! 3. **Persistence**: snapshot content, idempotent restore, JSON round trip
//! 4. **Maintenance**: pruning, statistics

use corelib::member::{MemberId, SimMember};
use corelib::network::NetworkId;
use directory::{NetworkDirectory, NetworkRecord};
use std::sync::{Arc, Barrier};

fn sim(id: u128, max: u64, stored: u64) -> Arc<SimMember> {
    let m = Arc::new(SimMember::new(MemberId(id), format!("m{}", id), max));
    m.set_stored_energy(stored);
    m
}

// ============================================================================
// Resolution Tests
// ============================================================================

#[test]
fn test_concurrent_resolve_is_single_winner() {
    let dir = Arc::new(NetworkDirectory::new());
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                dir.resolve_or_create("contested")
            })
        })
        .collect();
    let ids: Vec<NetworkId> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(dir.network_count(), 1);
}

#[test]
fn test_lookup_by_identity_and_name_agree() {
    let dir = NetworkDirectory::new();
    let id = dir.resolve_or_create("alpha");

    let by_id = dir.lookup(id).expect("network by id");
    let by_name = dir.lookup_by_name("alpha").expect("network by name");
    assert_eq!(by_id.id(), by_name.id());
    assert_eq!(by_id.name(), "alpha");

    assert!(dir.lookup(NetworkId::random()).is_none());
    assert!(dir.lookup_by_name("missing").is_none());
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[test]
fn test_join_then_leave_reclaims_network() {
    let dir = NetworkDirectory::new();
    let member = sim(1, 100, 10);
    let id = dir.join_network("alpha", member);

    assert_eq!(dir.lookup(id).unwrap().member_count(), 1);

    dir.leave_network(id, MemberId(1));

    assert!(dir.lookup(id).is_none());
    assert!(dir.lookup_by_name("alpha").is_none());
    assert!(dir.network_names().is_empty());
}

#[test]
fn test_leave_keeps_network_with_remaining_members() {
    let dir = NetworkDirectory::new();
    let id = dir.join_network("alpha", sim(1, 100, 0));
    dir.add_member(id, sim(2, 100, 0));

    dir.leave_network(id, MemberId(1));

    let network = dir.lookup(id).expect("network still live");
    assert_eq!(network.member_count(), 1);
}

#[test]
fn test_destroyed_member_prunes_like_a_leave() {
    let dir = NetworkDirectory::new();
    let member = sim(1, 100, 0);
    let id = dir.join_network("alpha", member.clone());

    member.invalidate();

    assert_eq!(dir.prune_empty(), 1);
    assert!(dir.lookup(id).is_none());
    assert!(dir.lookup_by_name("alpha").is_none());
}

#[test]
fn test_rejoin_after_reclaim_creates_fresh_identity() {
    let dir = NetworkDirectory::new();
    let first = dir.join_network("alpha", sim(1, 100, 0));
    dir.leave_network(first, MemberId(1));

    let second = dir.join_network("alpha", sim(2, 100, 0));

    assert_ne!(first, second);
    assert_eq!(dir.lookup(second).unwrap().member_count(), 1);
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[test]
fn test_snapshot_skips_empty_networks() {
    let dir = NetworkDirectory::new();
    let populated = dir.join_network("alpha", sim(1, 100, 0));
    dir.resolve_or_create("idle");

    let records = dir.serialize_records();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, populated);
    assert_eq!(records[0].name, "alpha");
}

#[test]
fn test_restore_builds_empty_shells() {
    let saved = NetworkDirectory::new();
    let id = saved.join_network("alpha", sim(1, 100, 25));
    let records = saved.serialize_records();

    let restored = NetworkDirectory::new();
    restored.restore_records(records);

    let shell = restored.lookup(id).expect("restored shell");
    assert_eq!(shell.name(), "alpha");
    assert_eq!(shell.member_count(), 0);
    assert_eq!(restored.lookup_by_name("alpha").unwrap().id(), id);
}

#[test]
fn test_restore_is_idempotent() {
    let dir = NetworkDirectory::new();
    let record = NetworkRecord {
        id: NetworkId::random(),
        name: "alpha".to_string(),
    };

    dir.restore_records([record.clone()]);
    dir.add_member(record.id, sim(1, 100, 40));
    dir.restore_records([record.clone()]);

    assert_eq!(dir.network_count(), 1);
    assert_eq!(dir.lookup(record.id).unwrap().member_count(), 1);
}

#[test]
fn test_restore_never_rebinds_a_live_name() {
    let dir = NetworkDirectory::new();
    let live = dir.join_network("alpha", sim(1, 100, 0));

    let stale = NetworkRecord {
        id: NetworkId::random(),
        name: "alpha".to_string(),
    };
    dir.restore_records([stale.clone()]);

    assert_eq!(dir.network_count(), 1);
    assert!(dir.lookup(stale.id).is_none());
    assert_eq!(dir.lookup_by_name("alpha").unwrap().id(), live);
}

#[test]
fn test_json_round_trip() {
    let dir = NetworkDirectory::new();
    let a = dir.join_network("alpha", sim(1, 100, 0));
    let b = dir.join_network("beta", sim(2, 100, 0));

    let json = dir.to_json().unwrap();
    let restored = NetworkDirectory::new();
    restored.from_json(&json).unwrap();

    assert!(restored.lookup(a).is_some());
    assert!(restored.lookup(b).is_some());
    assert!(restored.from_json("not json").is_err());
}

// ============================================================================
// Maintenance Tests
// ============================================================================

#[test]
fn test_prune_empty_counts_and_clears() {
    let dir = NetworkDirectory::new();
    dir.resolve_or_create("idle-1");
    dir.resolve_or_create("idle-2");
    let busy = dir.join_network("busy", sim(1, 100, 0));

    assert_eq!(dir.prune_empty(), 2);
    assert_eq!(dir.network_count(), 1);
    assert!(dir.lookup(busy).is_some());
    assert_eq!(dir.network_names(), vec!["busy".to_string()]);

    // nothing left to prune
    assert_eq!(dir.prune_empty(), 0);
}

#[test]
fn test_statistics_spans_networks() {
    let dir = NetworkDirectory::new();
    let a = dir.join_network("alpha", sim(1, 100, 80));
    dir.add_member(a, sim(2, 100, 20));
    dir.join_network("beta", sim(3, 200, 100));

    let stats = dir.statistics();
    assert_eq!(stats.network_count, 2);
    assert_eq!(stats.member_count, 3);
    assert_eq!(stats.total_stored_energy, 200);
    assert_eq!(stats.total_max_energy, 400);
}
