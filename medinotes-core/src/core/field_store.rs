//! Ordered field bag backing every note.

use crate::FieldValue;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from field name to [`FieldValue`] plus creation and modification times.
///
/// Keys are case-sensitive and kept in first-insertion order; overwriting a key
/// keeps its original position. Any name may be stored, whether or not a
/// template declares it.
#[derive(Debug, Clone)]
pub struct FieldStore {
    fields: IndexMap<String, FieldValue>,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

/// Detached, deep-copied view of a [`FieldStore`].
///
/// Mutating the store after export never changes a snapshot, and
/// [`FieldStore::from_snapshot`] rebuilds identical values from one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub fields: IndexMap<String, FieldValue>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl FieldStore {
    /// Creates an empty store stamped with the current time.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            fields: IndexMap::new(),
            created_at: now,
            last_modified: now,
        }
    }

    /// Rebuilds a store from an exported snapshot, keeping its timestamps.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            fields: snapshot.fields,
            created_at: snapshot.created_at,
            last_modified: snapshot.last_modified,
        }
    }

    /// Stores `value` under `name`, replacing any previous value of either kind.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
        self.touch();
    }

    /// Applies [`set`](Self::set) for every entry in iteration order.
    ///
    /// The whole batch shares a single `last_modified` stamp.
    pub fn set_many<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        for (name, value) in entries {
            self.fields.insert(name.into(), value.into());
        }
        self.touch();
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the stored value, or `default` when `name` was never set.
    pub fn get_or(&self, name: &str, default: FieldValue) -> FieldValue {
        self.fields.get(name).cloned().unwrap_or(default)
    }

    /// Returns the stored value, or an empty scalar when `name` was never set.
    pub fn get_or_empty(&self, name: &str) -> FieldValue {
        self.get_or(name, FieldValue::default())
    }

    /// Returns `true` when `name` holds a non-empty value.
    pub fn is_present(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Removes every field. `created_at` is kept; `last_modified` moves to now.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.touch();
    }

    pub fn export(&self) -> StoreSnapshot {
        StoreSnapshot {
            fields: self.fields.clone(),
            created_at: self.created_at,
            last_modified: self.last_modified,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new()
    }
}
