//! Fstore: an embedded record store with one file per row
//!
//! Fstore provides:
//! - **Time-encoded ids**: every row gets a strictly increasing decimal id
//!   that also records when it was inserted
//! - **Id index**: a lazily loaded, sorted id cache per table
//! - **Queries**: filters, time windows, signed limits and id projection
//!   over the ordered id space
//! - **Pluggable storage**: JSON files by default, any [`RecordStore`] otherwise
//!
//! # Quick Start
//!
//! ```no_run
//! use fstore::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Open database (the directory must exist and be writable)
//! let db = Fstore::open("./data")?;
//! let users = db.table("users")?;
//!
//! // Insert, read and patch rows
//! let id = users.insert_serialize(&json!({"name": "Ana", "role": "admin"}))?;
//! users.update_serialize(&json!({"role": "owner"}), id)?;
//! let row = users.get(id)?;
//!
//! // Last ten admins, newest first
//! let admins = users
//!     .query()
//!     .filter(|row, _| row.get("role") == Some(&json!("admin")))
//!     .limit(-10)
//!     .rows()?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod date;
pub mod db;
pub mod index;
pub mod prelude;
pub mod query;
pub mod table;

// Re-export core types
pub use fstore_core::{
    config::StoreConfig,
    error::{FstoreError, Result},
    traits::RecordStore,
    types::{IdMap, Row, RowId, RowSet, ValueSet},
};

// Re-export implementations
pub use fstore_file::JsonFileStore;

// Re-export main types from this crate
pub use codec::{shared_minter, to_epoch_seconds, IdMinter};
pub use date::{format_epoch, format_id_date, parse_user_date, parse_user_date_at, DateLike};
pub use db::Fstore;
pub use index::{IdIndex, Limit};
pub use query::{Query, DEFAULT_ID_COLUMN};
pub use table::Table;
