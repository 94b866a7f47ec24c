//! Fstore Core: Traits and types for the fstore record store
//!
//! This crate defines the shared abstractions used by the storage backends
//! and the query layer:
//! - Row identifiers: time-encoded, strictly increasing decimal ids
//! - Rows: schemaless ordered JSON objects, one per id
//! - Record store: the persistence contract a backend must satisfy
//! - Configuration: root location and on-disk encoding options

pub mod config;
pub mod error;
pub mod observe;
pub mod traits;
pub mod types;

pub use config::StoreConfig;
pub use error::{FstoreError, Result};
pub use traits::RecordStore;
pub use types::{IdMap, Row, RowId, RowSet, ValueSet};
