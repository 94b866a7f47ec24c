//! Fstore Prelude
//!
//! Import this to get all commonly used types and traits:
//!
//! ```
//! use fstore::prelude::*;
//! ```

// Core types
pub use crate::{Fstore, FstoreError, Result, Row, RowId, RowSet, Table, ValueSet};

// Querying
pub use crate::{DateLike, Limit, Query};

// Storage
pub use crate::{JsonFileStore, RecordStore, StoreConfig};

// Re-export common external deps
pub use serde::{Deserialize, Serialize};
pub use serde_json::{json, Value};
pub use std::sync::Arc;
