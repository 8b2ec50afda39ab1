//! Sparse raw-value store.
//!
//! Only edited cells are present; an absent address reads as the empty
//! string. The store does not enforce the read-only gate itself: `Matrix`
//! is the only writer and checks every address before it gets here.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use entrygrid_core::CellPos;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawValues {
    cells: BTreeMap<CellPos, String>,
}

impl RawValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: CellPos) -> Option<&str> {
        self.cells.get(&pos).map(String::as_str)
    }

    /// Insert or replace a value. Returns true if the stored value changed.
    pub fn insert(&mut self, pos: CellPos, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.cells.get(&pos) {
            Some(existing) if *existing == value => false,
            _ => {
                self.cells.insert(pos, value);
                true
            }
        }
    }

    /// Remove a value. Returns true if something was removed.
    pub fn remove(&mut self, pos: CellPos) -> bool {
        self.cells.remove(&pos).is_some()
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Iterate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, &str)> + '_ {
        self.cells.iter().map(|(pos, v)| (*pos, v.as_str()))
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain<F: FnMut(CellPos, &str) -> bool>(&mut self, mut keep: F) {
        self.cells.retain(|pos, v| keep(*pos, v));
    }
}

impl FromIterator<(CellPos, String)> for RawValues {
    fn from_iter<I: IntoIterator<Item = (CellPos, String)>>(iter: I) -> Self {
        Self { cells: iter.into_iter().collect() }
    }
}

impl<'a> FromIterator<((usize, usize), &'a str)> for RawValues {
    fn from_iter<I: IntoIterator<Item = ((usize, usize), &'a str)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(pos, v)| (CellPos::from(pos), v.to_string()))
                .collect(),
        }
    }
}

// Serialized as a flat object keyed by "row-col", the shape consumers of
// the change notification already expect.
impl Serialize for RawValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (pos, value) in &self.cells {
            map.serialize_entry(&pos.to_string(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawValuesVisitor;

        impl<'de> Visitor<'de> for RawValuesVisitor {
            type Value = RawValues;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of \"row-col\" keys to strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawValues, A::Error> {
                let mut values = RawValues::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    let pos: CellPos = key.parse().map_err(de::Error::custom)?;
                    values.cells.insert(pos, value);
                }
                Ok(values)
            }
        }

        deserializer.deserialize_map(RawValuesVisitor)
    }
}
