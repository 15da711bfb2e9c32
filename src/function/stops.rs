//! Stop keys and stop tables.
//!
//! A stop table maps keys (zoom thresholds or attribute values) to outputs.
//! Keys are kept in a total order (numbers ascending, then strings
//! lexicographic, then booleans false-before-true) so serialization and
//! equality never depend on insertion order.

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use serde_json::Value as Json;

use crate::error::{Result, StyleError};
use crate::types::AttrValue;

/// A stop key: a zoom threshold (numeric) or an attribute match value.
#[derive(Debug, Clone)]
pub enum StopKey {
    Number(f64),
    String(String),
    Bool(bool),
}

impl StopKey {
    /// Numeric view, for zoom thresholds and ordered interpolation.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StopKey::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Serialize into the style representation.
    pub fn to_json(&self) -> Json {
        match self {
            StopKey::Number(n) => Json::from(*n),
            StopKey::String(s) => Json::from(s.clone()),
            StopKey::Bool(b) => Json::from(*b),
        }
    }

    /// Reconstruct from the style representation.
    pub fn from_json(json: &Json) -> Result<Self> {
        match json {
            Json::Number(n) => {
                let n = n
                    .as_f64()
                    .ok_or_else(|| StyleError::malformed(format!("unrepresentable key: {}", json)))?;
                Ok(StopKey::Number(n))
            }
            Json::String(s) => Ok(StopKey::String(s.clone())),
            Json::Bool(b) => Ok(StopKey::Bool(*b)),
            _ => Err(StyleError::malformed(format!(
                "stop key must be a number, string, or boolean, got {}",
                json
            ))),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            StopKey::Number(_) => 0,
            StopKey::String(_) => 1,
            StopKey::Bool(_) => 2,
        }
    }
}

// Manual equality and ordering: f64 keys compare via total_cmp so the table
// has a genuine total order. Non-finite numeric keys are rejected on insert.
impl PartialEq for StopKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StopKey {}

impl PartialOrd for StopKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StopKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (StopKey::Number(a), StopKey::Number(b)) => a.total_cmp(b),
            (StopKey::String(a), StopKey::String(b)) => a.cmp(b),
            (StopKey::Bool(a), StopKey::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopKey::Number(n) => write!(f, "{}", n),
            StopKey::String(s) => write!(f, "\"{}\"", s),
            StopKey::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for StopKey {
    fn from(value: f64) -> Self {
        StopKey::Number(value)
    }
}

impl From<i32> for StopKey {
    fn from(value: i32) -> Self {
        StopKey::Number(value as f64)
    }
}

impl From<u32> for StopKey {
    fn from(value: u32) -> Self {
        StopKey::Number(value as f64)
    }
}

impl From<bool> for StopKey {
    fn from(value: bool) -> Self {
        StopKey::Bool(value)
    }
}

impl From<String> for StopKey {
    fn from(value: String) -> Self {
        StopKey::String(value)
    }
}

impl From<&str> for StopKey {
    fn from(value: &str) -> Self {
        StopKey::String(value.to_string())
    }
}

impl From<&AttrValue> for StopKey {
    fn from(value: &AttrValue) -> Self {
        match value {
            AttrValue::Number(n) => StopKey::Number(*n),
            AttrValue::String(s) => StopKey::String(s.clone()),
            AttrValue::Bool(b) => StopKey::Bool(*b),
        }
    }
}

/// An ordered mapping from stop keys to outputs.
///
/// `V` is the output type: a plain style value for camera and source
/// functions, or an inner `StopTable` for the outer level of a composite
/// function. Immutable once attached to a function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StopTable<V> {
    entries: BTreeMap<StopKey, V>,
}

impl<V> StopTable<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a table from (key, value) pairs.
    pub fn from_pairs<K, I>(pairs: I) -> Result<Self>
    where
        K: Into<StopKey>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut table = Self::new();
        for (key, value) in pairs {
            table.insert(key, value)?;
        }
        Ok(table)
    }

    /// Insert a stop.
    ///
    /// Fails with `DuplicateKey` when the key is already present, and rejects
    /// non-finite numeric keys.
    pub fn insert(&mut self, key: impl Into<StopKey>, value: V) -> Result<()> {
        let key = key.into();
        if let StopKey::Number(n) = &key {
            if !n.is_finite() {
                return Err(StyleError::malformed(format!(
                    "non-finite numeric stop key: {}",
                    n
                )));
            }
        }
        match self.entries.entry(key) {
            btree_map::Entry::Occupied(entry) => Err(StyleError::DuplicateKey {
                key: entry.key().to_string(),
            }),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Look up a stop by exact key.
    pub fn get(&self, key: &StopKey) -> Option<&V> {
        self.entries.get(key)
    }

    /// Look up a stop by exact key, failing with `NotFound` on a miss.
    pub fn lookup(&self, key: &StopKey) -> Result<&V> {
        self.get(key).ok_or_else(|| StyleError::NotFound {
            name: key.to_string(),
        })
    }

    /// Keys in total order.
    pub fn keys(&self) -> impl Iterator<Item = &StopKey> {
        self.entries.keys()
    }

    /// (key, value) pairs in total order.
    pub fn iter(&self) -> impl Iterator<Item = (&StopKey, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every key is numeric (required for zoom stops and for the
    /// ordered interpolation modes).
    pub fn all_numeric(&self) -> bool {
        self.entries.keys().all(|k| k.as_number().is_some())
    }

    /// Greatest numeric key at or below `x`.
    ///
    /// Numbers sort before other key variants, so the range scan never walks
    /// string or boolean keys.
    pub(crate) fn floor_numeric(&self, x: f64) -> Option<(f64, &V)> {
        self.entries
            .range(..=StopKey::Number(x))
            .next_back()
            .and_then(|(k, v)| k.as_number().map(|n| (n, v)))
    }

    /// Least numeric key strictly above `x`.
    pub(crate) fn ceiling_numeric(&self, x: f64) -> Option<(f64, &V)> {
        self.entries
            .range((Bound::Excluded(StopKey::Number(x)), Bound::Unbounded))
            .next()
            .and_then(|(k, v)| k.as_number().map(|n| (n, v)))
    }

    /// Smallest numeric key in the table.
    pub(crate) fn first_numeric(&self) -> Option<(f64, &V)> {
        self.entries
            .iter()
            .next()
            .and_then(|(k, v)| k.as_number().map(|n| (n, v)))
    }
}
