//! Record store trait
//!
//! Defines the persistence contract for row bodies. The query layer only
//! relies on what is listed here; directory layout and encoding belong to
//! the implementation.

use crate::error::Result;
use crate::types::{Row, RowId};
use std::path::Path;

/// Per-table keyed persistence of row bodies
///
/// One durable unit per id: enumerable, independently readable and
/// independently deletable.
pub trait RecordStore: Send + Sync {
    /// Root location this store persists under
    fn root(&self) -> &Path;

    /// Create the table namespace if it does not exist yet
    ///
    /// Idempotent. Called before the first write to a table.
    fn ensure_table(&self, table: &str) -> Result<()>;

    /// Create or overwrite the row stored under `id`
    fn put(&self, table: &str, id: RowId, row: &Row) -> Result<()>;

    /// Load the row stored under `id`
    ///
    /// Fails with `NotFound` if no record exists.
    fn get(&self, table: &str, id: RowId) -> Result<Row>;

    /// Remove the row stored under `id`
    ///
    /// Removing an absent row is not an error.
    fn delete(&self, table: &str, id: RowId) -> Result<()>;

    /// Check whether a record exists for `id`
    fn contains(&self, table: &str, id: RowId) -> Result<bool>;

    /// Enumerate the ids of every persisted record, in no particular order
    ///
    /// A table that was never written to yields an empty list.
    fn list_ids(&self, table: &str) -> Result<Vec<RowId>>;
}
