use fstore_core::{
    config::StoreConfig,
    error::{FstoreError, Result},
    traits::RecordStore,
    types::{Row, RowId},
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reject table names that would escape the root or nest directories
pub fn validate_table_name(table: &str) -> Result<()> {
    if table.is_empty()
        || table == "."
        || table == ".."
        || table.contains(['/', '\\', '\0'])
    {
        return Err(FstoreError::InvalidTableName(table.to_string()));
    }
    Ok(())
}

/// JSON file-per-row record store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: StoreConfig,
}

impl JsonFileStore {
    /// Open a store rooted at an existing, writable directory
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!("Opened record store at {}", config.root.display());
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Directory holding a table's records
    pub fn table_dir(&self, table: &str) -> Result<PathBuf> {
        validate_table_name(table)?;
        Ok(self.config.root.join(table))
    }

    fn record_path(&self, table: &str, id: RowId) -> Result<PathBuf> {
        let mut path = self.table_dir(table)?;
        path.push(format!("{}.{}", id, self.config.file_extension));
        Ok(path)
    }

    /// Parse a directory entry name back into an id
    ///
    /// Returns `None` for files that are not records of this store. Stems
    /// that parse but are not the canonical spelling of their id (`0017`)
    /// are rejected, since the id would resolve to a different file.
    fn id_from_file_name(&self, name: &str) -> Option<std::result::Result<RowId, FstoreError>> {
        let stem = name
            .strip_suffix(self.config.file_extension.as_str())?
            .strip_suffix('.')?;
        Some(
            stem.parse::<RowId>()
                .and_then(|id| match id.to_string() == stem {
                    true => Ok(id),
                    false => Err(FstoreError::InvalidId(stem.to_string())),
                }),
        )
    }

    fn encode(&self, row: &Row) -> Result<Vec<u8>> {
        let bytes = if self.config.pretty_json {
            serde_json::to_vec_pretty(row)?
        } else {
            serde_json::to_vec(row)?
        };
        Ok(bytes)
    }
}

impl RecordStore for JsonFileStore {
    fn root(&self) -> &Path {
        &self.config.root
    }

    fn ensure_table(&self, table: &str) -> Result<()> {
        let dir = self.table_dir(table)?;
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)?;
            tracing::info!("Created table directory {}", dir.display());
        }
        Ok(())
    }

    fn put(&self, table: &str, id: RowId, row: &Row) -> Result<()> {
        let path = self.record_path(table, id)?;
        let bytes = self.encode(row)?;
        std::fs::write(&path, bytes)?;
        Ok(())
    }

    fn get(&self, table: &str, id: RowId) -> Result<Row> {
        let path = self.record_path(table, id)?;
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FstoreError::not_found(table, id));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&data).map_err(|e| {
            FstoreError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn delete(&self, table: &str, id: RowId) -> Result<()> {
        let path = self.record_path(table, id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Delete of absent row {} on table '{}'", id, table);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, table: &str, id: RowId) -> Result<bool> {
        Ok(self.record_path(table, id)?.is_file())
    }

    fn list_ids(&self, table: &str) -> Result<Vec<RowId>> {
        let dir = self.table_dir(table)?;
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            match self.id_from_file_name(name) {
                Some(Ok(id)) => ids.push(id),
                Some(Err(_)) => {
                    tracing::warn!("Skipping record file with non-canonical id name: {}", name);
                }
                None => {
                    tracing::debug!("Ignoring non-record file in {}: {}", dir.display(), name);
                }
            }
        }

        Ok(ids)
    }
}
