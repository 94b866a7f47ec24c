use super::id::RowId;
use serde_json::Value;

/// A schemaless row: column name to JSON value, in column insertion order
pub type Row = serde_json::Map<String, Value>;

/// Query result rows keyed by id, in scan order
pub type RowSet = IdMap<Row>;

/// Single-column query result keyed by id, in scan order
pub type ValueSet = IdMap<Value>;

/// Ordered id-keyed mapping
///
/// Entries keep the order in which they were pushed, which for query
/// results is the scan order (ascending ids, or descending for a negative
/// limit). Ids are unique because every scan visits each id once.
#[derive(Debug, Clone, PartialEq)]
pub struct IdMap<V> {
    entries: Vec<(RowId, V)>,
}

impl<V> IdMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, id: RowId, value: V) {
        self.entries.push((id, value));
    }

    pub fn get(&self, id: &RowId) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<RowId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn into_ids(self) -> Vec<RowId> {
        self.entries.into_iter().map(|(id, _)| id).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RowId, &V)> {
        self.entries.iter().map(|(id, v)| (id, v))
    }

    /// Transform every value, keeping ids and order
    pub fn map_values<U>(self, mut f: impl FnMut(V) -> U) -> IdMap<U> {
        IdMap {
            entries: self.entries.into_iter().map(|(id, v)| (id, f(v))).collect(),
        }
    }
}

impl<V> Default for IdMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntoIterator for IdMap<V> {
    type Item = (RowId, V);
    type IntoIter = std::vec::IntoIter<(RowId, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V> FromIterator<(RowId, V)> for IdMap<V> {
    fn from_iter<I: IntoIterator<Item = (RowId, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
