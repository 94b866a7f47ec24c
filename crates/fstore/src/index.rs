//! Cached, ordered id index per table
//!
//! The index is populated lazily from the record store on first use and
//! then kept current by inserts. Deletes are not reflected: a populated
//! index keeps listing a deleted id until the owning [`crate::Fstore`] is
//! dropped, and reading that id fails with `NotFound`.

use fstore_core::{observe, FstoreError, RecordStore, Result, RowId};
use parking_lot::Mutex;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Signed result bound
///
/// - `0`: unbounded
/// - `n > 0`: the first `n` ids, ascending
/// - `n < 0`: the last `|n|` ids, descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit(i64);

impl Limit {
    pub const NONE: Limit = Limit(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse caller-supplied limit text
    ///
    /// Empty text clears the limit. Anything that is not a whole number is
    /// rejected rather than coerced.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Limit::NONE);
        }
        trimmed
            .parse::<i64>()
            .map(Limit)
            .map_err(|_| FstoreError::InvalidLimit(format!("{:?} is not an integer", text)))
    }

    pub const fn get(&self) -> i64 {
        self.0
    }

    pub const fn is_unbounded(&self) -> bool {
        self.0 == 0
    }

    /// True when the limit counts from the most recent end
    pub const fn is_descending(&self) -> bool {
        self.0 < 0
    }

    /// Maximum number of results, if bounded
    pub fn count(&self) -> Option<usize> {
        match self.0 {
            0 => None,
            n => Some(usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX)),
        }
    }

    /// Apply the limit to an ascending id list
    pub fn slice(&self, mut ids: Vec<RowId>) -> Vec<RowId> {
        let Some(count) = self.count() else {
            return ids;
        };
        if self.is_descending() {
            let start = ids.len().saturating_sub(count);
            let mut tail = ids.split_off(start);
            tail.reverse();
            tail
        } else {
            ids.truncate(count);
            ids
        }
    }
}

impl From<i64> for Limit {
    fn from(value: i64) -> Self {
        Limit(value)
    }
}

impl From<i32> for Limit {
    fn from(value: i32) -> Self {
        Limit(value.into())
    }
}

impl From<Option<i64>> for Limit {
    fn from(value: Option<i64>) -> Self {
        Limit(value.unwrap_or(0))
    }
}

impl FromStr for Limit {
    type Err = FstoreError;

    fn from_str(s: &str) -> Result<Self> {
        Limit::parse(s)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sorted id cache for one table
pub struct IdIndex {
    table: String,
    ids: Mutex<Option<Vec<RowId>>>,
}

impl IdIndex {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ids: Mutex::new(None),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether the cache has been populated from storage
    pub fn is_loaded(&self) -> bool {
        self.ids.lock().is_some()
    }

    /// Every known id, ascending
    ///
    /// The first call scans the store; later calls reuse the cache.
    pub fn list_all(&self, store: &dyn RecordStore) -> Result<Vec<RowId>> {
        let mut guard = self.ids.lock();
        match guard.as_ref() {
            Some(ids) => Ok(ids.clone()),
            None => {
                let started = Instant::now();
                let mut ids = store.list_ids(&self.table)?;
                ids.sort_unstable();

                observe::record_index_load(started.elapsed(), ids.len());
                observe::set_index_size(&self.table, ids.len());
                tracing::debug!(
                    "Loaded {} ids for table '{}' in {:?}",
                    ids.len(),
                    self.table,
                    started.elapsed()
                );

                *guard = Some(ids.clone());
                Ok(ids)
            }
        }
    }

    /// Ids bounded by a signed limit, see [`Limit`]
    pub fn list_bounded(
        &self,
        store: &dyn RecordStore,
        limit: impl Into<Limit>,
    ) -> Result<Vec<RowId>> {
        let ids = self.list_all(store)?;
        Ok(limit.into().slice(ids))
    }

    /// Record a newly inserted id
    ///
    /// Ignored until the cache is populated; the first population reads the
    /// id from storage anyway.
    pub fn on_insert(&self, id: RowId) {
        let mut guard = self.ids.lock();
        let Some(ids) = guard.as_mut() else {
            return;
        };

        match ids.last() {
            Some(last) if *last >= id => {
                // Another writer got ahead of this process's clock
                if let Err(pos) = ids.binary_search(&id) {
                    ids.insert(pos, id);
                }
            }
            _ => ids.push(id),
        }
        observe::set_index_size(&self.table, ids.len());
    }
}

impl fmt::Debug for IdIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdIndex")
            .field("table", &self.table)
            .field("cached", &self.ids.lock().as_ref().map(Vec::len))
            .finish()
    }
}
