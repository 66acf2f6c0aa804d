// ABOUTME: The two in-memory stores: the append-only packet sequence and the keyed table.
// ABOUTME: Neither store locks internally; a concurrent host must serialize mutating calls.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::packet::{LookupError, Packet};
use crate::query::TimeQuery;

/// An append-only ordered sequence of packets, indexed `0..n-1` in call
/// order. There is no deletion or mutation API; the sequence only grows,
/// or is replaced wholesale by a snapshot load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnnamedStore {
    packets: Vec<Packet>,
}

impl UnnamedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a packet stamped with the current floored unix second.
    /// Returns the index of the new packet, which equals `len - 1` at the
    /// moment of append.
    pub fn append(&mut self, source: impl Into<String>, data: Value) -> usize {
        self.packets
            .push(Packet::new(source.into(), Utc::now().timestamp(), data));
        self.packets.len() - 1
    }

    /// All packets satisfying `predicate`, in insertion order.
    pub fn filter<F>(&self, predicate: F) -> Vec<&Packet>
    where
        F: Fn(&Packet) -> bool,
    {
        self.packets.iter().filter(|p| predicate(p)).collect()
    }

    /// All packets whose timestamp matches the time window, in insertion order.
    pub fn query(&self, query: TimeQuery) -> Vec<&Packet> {
        self.filter(|p| query.matches(p.timestamp()))
    }

    /// All packets recorded from the given source, in insertion order.
    pub fn by_source(&self, host: &str) -> Vec<&Packet> {
        self.filter(|p| p.source() == host)
    }

    pub fn get(&self, index: usize) -> Option<&Packet> {
        self.packets.get(index)
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}

/// A keyed table of arbitrary values, independent of the packet sequence.
/// Keys are unique; iteration order is key-sorted, which keeps reports and
/// snapshots deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedStore {
    entries: BTreeMap<String, Value>,
}

impl NamedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `name`, overwriting any existing entry.
    pub fn upsert(&mut self, name: impl Into<String>, data: Value) {
        self.entries.insert(name.into(), data);
    }

    /// Store `data` under `name` only when the key is absent. An existing
    /// entry is never overwritten, even when its value is empty or null.
    /// Returns whether the insert happened.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, data: Value) -> bool {
        match self.entries.entry(name.into()) {
            Entry::Vacant(slot) => {
                slot.insert(data);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, name: &str) -> Result<&Value, LookupError> {
        self.entries
            .get(name)
            .ok_or_else(|| LookupError::KeyNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
