pub mod id;
pub mod row;

pub use id::RowId;
pub use row::{IdMap, Row, RowSet, ValueSet};
