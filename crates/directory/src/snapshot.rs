//! Durable identity ↔ name records.
//!
//! The snapshot carries only the binding between a network's identity and
//! its name. Membership is never persisted: members rejoin on their own
//! after a restart, repopulating the reconstructed shells lazily. The host
//! owns when these hooks run and where the bytes go.

use crate::directory::NetworkDirectory;
use crate::error::Result;
use corelib::network::{NetworkId, ResourceNetwork};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// One persisted name binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub id: NetworkId,
    pub name: String,
}

impl NetworkDirectory {
    /// Records for every live, non-empty network.
    ///
    /// A network with no members at save time is dropped from the snapshot
    /// — its binding is only worth remembering while someone is using it.
    pub fn serialize_records(&self) -> Vec<NetworkRecord> {
        self.networks
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| NetworkRecord {
                id: *entry.key(),
                name: entry.value().name().to_string(),
            })
            .collect()
    }

    /// Reconstruct empty network shells for persisted identities.
    ///
    /// Idempotent: a record whose identity is already live is skipped, and
    /// a record whose name is already bound to a different identity is
    /// skipped too — restore fills in missing entries, never overwrites or
    /// duplicates.
    pub fn restore_records(&self, records: impl IntoIterator<Item = NetworkRecord>) {
        for record in records {
            if self.networks.contains_key(&record.id) {
                continue;
            }
            let mut restored = false;
            self.by_name.entry(record.name.clone()).or_insert_with(|| {
                self.networks.insert(
                    record.id,
                    Arc::new(ResourceNetwork::new(record.id, &record.name)),
                );
                restored = true;
                record.id
            });
            if restored {
                debug!(network = %record.id, name = %record.name, "restored network shell");
            }
        }
    }

    /// Snapshot as a JSON blob, for hosts that persist opaque strings.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.serialize_records())?)
    }

    /// Restore from a JSON blob produced by `to_json`.
    pub fn from_json(&self, json: &str) -> Result<()> {
        let records: Vec<NetworkRecord> = serde_json::from_str(json)?;
        self.restore_records(records);
        Ok(())
    }
}
