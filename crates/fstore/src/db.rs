//! Unified fstore database interface
//!
//! Provides the single entry point that owns the record store and hands out
//! table handles.

use crate::date::format_id_date;
use crate::table::{Table, TableState};
use fstore_core::{RecordStore, Result, RowId, StoreConfig};
use fstore_file::{validate_table_name, JsonFileStore};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Fstore database
///
/// Owns the record store and the per-table id index caches. Caches live as
/// long as the `Fstore` they came from, so two `Fstore` values over the same
/// root do not share them. Id minters are process-wide per root and table,
/// so such values never mint the same id.
pub struct Fstore {
    store: Arc<dyn RecordStore>,
    tables: Mutex<HashMap<String, Arc<TableState>>>,
}

impl Fstore {
    /// Open a database rooted at an existing, writable directory
    ///
    /// Records are stored as `{path}/{table}/{id}.json`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(StoreConfig::new(path.as_ref()))
    }

    /// Open with custom store configuration
    pub fn open_with_config(config: StoreConfig) -> Result<Self> {
        let store = JsonFileStore::open(config)?;
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Use an already opened record store
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Root directory of the store
    pub fn dir(&self) -> &Path {
        self.store.root()
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Get a handle to a table
    ///
    /// Nothing is created on disk until the first insert.
    pub fn table(&self, name: &str) -> Result<Table> {
        validate_table_name(name)?;

        let root = self.store.root();
        let state = {
            let mut tables = self.tables.lock();
            tables
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(TableState::new(root, name)))
                .clone()
        };

        Ok(Table::new(name.to_string(), self.store.clone(), state))
    }

    /// Names of tables handed out so far
    pub fn opened_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Format the insertion time encoded in `id`
    pub fn date(&self, format: &str, id: RowId) -> Result<String> {
        format_id_date(format, id)
    }
}

impl std::fmt::Debug for Fstore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fstore")
            .field("root", &self.store.root())
            .field("tables", &self.opened_tables())
            .finish()
    }
}
