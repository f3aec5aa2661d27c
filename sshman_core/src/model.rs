use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One cached SSH shortcut.
///
/// The JSON field names match the config file format:
/// `{ "type": "server", "project": "alpha", "ssh_command": "ssh ...", "password": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    #[serde(rename = "type")]
    pub conn_type: String,
    pub project: String,
    pub ssh_command: String,
    pub password: String,
}

impl ConnectionRecord {
    /// The identity key used in the config file: `"{project}@{type}"`.
    pub fn key(&self) -> String {
        format!("{}@{}", self.project, self.conn_type)
    }
}

/// Insertion-ordered map of key -> record.
///
/// Iteration order is the order records arrived from the remote API, which
/// is also the row order of the table. Inserting an existing key overwrites
/// the value in place and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSet {
    entries: Vec<(String, ConnectionRecord)>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert under the record's own `"{project}@{type}"` key.
    pub fn insert(&mut self, record: ConnectionRecord) {
        self.insert_entry(record.key(), record);
    }

    fn insert_entry(&mut self, key: String, record: ConnectionRecord) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = record;
        } else {
            self.entries.push((key, record));
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConnectionRecord> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, r)| r)
    }

    /// Record at a 0-based position in iteration order.
    pub fn get_index(&self, index: usize) -> Option<&ConnectionRecord> {
        self.entries.get(index).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConnectionRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }
}

/// Serialized as a plain JSON object, preserving entry order.
impl Serialize for ConnectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in &self.entries {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConnectionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = ConnectionSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of connection records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = ConnectionSet::new();
                // Keys are kept verbatim from the file rather than recomputed,
                // so a hand-edited config round-trips unchanged.
                while let Some((key, record)) = access.next_entry::<String, ConnectionRecord>()? {
                    set.insert_entry(key, record);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}
