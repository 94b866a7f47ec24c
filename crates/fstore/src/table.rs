//! Table handle
//!
//! A table is a named set of rows, created implicitly by its first insert.
//! Handles are cheap to clone; every handle for the same name obtained from
//! one [`crate::Fstore`] shares the same id index and id minter.

use crate::codec::{shared_minter, IdMinter};
use crate::date::format_id_date;
use crate::index::{IdIndex, Limit};
use crate::query::Query;
use fstore_core::{observe, FstoreError, RecordStore, Result, Row, RowId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-table state shared by all handles of one store
///
/// The index belongs to one `Fstore`; the minter is shared process-wide by
/// every `Fstore` on the same root.
#[derive(Debug)]
pub(crate) struct TableState {
    pub(crate) index: IdIndex,
    pub(crate) minter: Arc<IdMinter>,
}

impl TableState {
    pub(crate) fn new(root: &Path, table: &str) -> Self {
        Self {
            index: IdIndex::new(table),
            minter: shared_minter(root, table),
        }
    }
}

/// Handle to one table
#[derive(Clone)]
pub struct Table {
    name: String,
    store: Arc<dyn RecordStore>,
    state: Arc<TableState>,
}

impl Table {
    pub(crate) fn new(name: String, store: Arc<dyn RecordStore>, state: Arc<TableState>) -> Self {
        Self { name, store, state }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the table's records under the store root
    pub fn dir(&self) -> PathBuf {
        self.store.root().join(&self.name)
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn index(&self) -> &IdIndex {
        &self.state.index
    }

    /// Persist a new row and return its freshly minted id
    pub fn insert(&self, row: &Row) -> Result<RowId> {
        let id = self.state.minter.mint()?;
        self.store.ensure_table(&self.name)?;
        self.store.put(&self.name, id, row)?;
        self.state.index.on_insert(id);

        observe::record_insert();
        tracing::debug!("Inserted row {} into '{}'", id, self.name);
        Ok(id)
    }

    /// Insert any value that serializes to a JSON object
    pub fn insert_serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<RowId> {
        let row = to_row(value)?;
        self.insert(&row)
    }

    /// Merge `partial` over the stored row, replacing columns by name
    pub fn update(&self, partial: &Row, id: RowId) -> Result<()> {
        let mut row = self.get(id)?;
        for (column, value) in partial {
            row.insert(column.clone(), value.clone());
        }
        self.store.put(&self.name, id, &row)
    }

    /// Like [`Table::update`], for any value that serializes to a JSON object
    pub fn update_serialize<T: Serialize + ?Sized>(&self, partial: &T, id: RowId) -> Result<()> {
        let partial = to_row(partial)?;
        self.update(&partial, id)
    }

    pub fn get(&self, id: RowId) -> Result<Row> {
        self.store.get(&self.name, id)
    }

    /// Load a row and deserialize it into `T`
    pub fn get_as<T: DeserializeOwned>(&self, id: RowId) -> Result<T> {
        let row = self.get(id)?;
        Ok(serde_json::from_value(serde_json::Value::Object(row))?)
    }

    pub fn contains(&self, id: RowId) -> Result<bool> {
        self.store.contains(&self.name, id)
    }

    /// Remove a row
    ///
    /// The id index is left as is; see [`crate::index`].
    pub fn delete(&self, id: RowId) -> Result<()> {
        self.store.delete(&self.name, id)
    }

    /// All ids, or a bounded slice of them, see [`Limit`]
    pub fn ids(&self, limit: impl Into<Limit>) -> Result<Vec<RowId>> {
        self.state.index.list_bounded(self.store.as_ref(), limit)
    }

    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }

    /// Format the insertion time encoded in `id`
    pub fn date(&self, format: &str, id: RowId) -> Result<String> {
        format_id_date(format, id)
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("root", &self.store.root())
            .field("index", &self.state.index)
            .finish()
    }
}

fn to_row<T: Serialize + ?Sized>(value: &T) -> Result<Row> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(row) => Ok(row),
        other => Err(FstoreError::Serialization(format!(
            "Rows must serialize to a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
