//! Benchmark report data shared by the agent and the aggregator.
//!
//! A [`ControlRecord`] is one benchmark category as emitted by the external
//! tool. Only its `id` is interpreted; everything else is carried through
//! untouched. A [`NodeReport`] is one agent's snapshot and an
//! [`AggregatedReport`] is the cluster-wide merge of all snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Category id whose result applies to the whole cluster instead of a node.
pub const DEFAULT_POLICIES_ID: &str = "5";

/// One benchmark category result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub id: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ControlRecord {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: Map::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_owned(), value.into());
        self
    }
}

/// A node's full snapshot, in the order the tool reported it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Controls", default, deserialize_with = "null_as_empty")]
    pub controls: Vec<ControlRecord>,
}

impl NodeReport {
    #[must_use]
    pub fn new(name: impl Into<String>, controls: Vec<ControlRecord>) -> Self {
        Self {
            name: name.into(),
            controls,
        }
    }

    /// Report with no controls, served before the first successful refresh.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

// Agents built against older encoders send `"Controls": null` for an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ControlRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ControlRecord>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Derives the aggregated key of a control reported by `node`.
///
/// The policies category collapses to its bare id so every node writes the
/// same entry; all other categories are scoped as `node/id`.
#[must_use]
pub fn merge_key(policies_id: &str, node: &str, control: &ControlRecord) -> String {
    if control.id == policies_id {
        return control.id.clone();
    }
    format!("{}/{}", node, control.id)
}

/// Cluster-wide report keyed by [`merge_key`].
///
/// Entries are kept sorted so identical inputs always serialize to the same
/// bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedReport {
    entries: BTreeMap<String, ControlRecord>,
}

impl AggregatedReport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Stores `control` under `key`, returning the record it replaced.
    pub fn insert(&mut self, key: String, control: ControlRecord) -> Option<ControlRecord> {
        self.entries.insert(key, control)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ControlRecord> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Two-space indented JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload value cannot be serialized.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
