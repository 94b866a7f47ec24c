//! File-based record store implementation
//!
//! Persists each row as its own JSON document so that every record is
//! individually addressable, enumerable and deletable with plain file
//! operations.
//!
//! Layout:
//! - `{root}/{table}/` - one directory per table, created on first write
//! - `{root}/{table}/{id}.json` - one file per row, named by its decimal id

mod store;

pub use store::{validate_table_name, JsonFileStore};
