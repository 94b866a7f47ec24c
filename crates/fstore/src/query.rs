//! Query builder over a table's ordered id space
//!
//! A [`Query`] collects a limit, a derived-time window, filter predicates
//! and id projection, and does no I/O until a terminal call: [`Query::rows`],
//! [`Query::values`] or [`Query::ids`]. Terminal calls borrow the builder,
//! so the same query can be executed again; every execution starts from
//! scratch.
//!
//! # Example
//!
//! ```no_run
//! use fstore::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let db = Fstore::open("./data")?;
//! let letters = db.table("letters")?;
//!
//! let recent_vowels = letters
//!     .query()
//!     .since("-7 days")?
//!     .filter(|row, _id| {
//!         row.get("letter")
//!             .and_then(|v| v.as_str())
//!             .is_some_and(|l| "aeiou".contains(l))
//!     })
//!     .limit(-5)
//!     .select_id_as("_id")
//!     .rows()?;
//! # Ok(())
//! # }
//! ```

use crate::date::{parse_user_date, DateLike};
use crate::index::Limit;
use crate::table::Table;
use fstore_core::{observe, Result, Row, RowId, RowSet, ValueSet};
use serde_json::Value;
use std::time::Instant;

/// Column name used by [`Query::select_id`]
pub const DEFAULT_ID_COLUMN: &str = "id";

type Filter<'a> = Box<dyn Fn(&Row, &RowId) -> bool + 'a>;

/// Stateful query over one table
pub struct Query<'a> {
    table: &'a Table,
    limit: Limit,
    since: Option<i64>,
    until: Option<i64>,
    filters: Vec<Filter<'a>>,
    id_column: Option<String>,
}

impl<'a> Query<'a> {
    pub(crate) fn new(table: &'a Table) -> Self {
        Self {
            table,
            limit: Limit::NONE,
            since: None,
            until: None,
            filters: Vec::new(),
            id_column: None,
        }
    }

    /// Bound the number of results; `0` clears the bound
    ///
    /// A positive limit keeps the oldest matches in ascending order, a
    /// negative one the newest matches in descending order. The bound
    /// applies after filtering.
    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = limit.into();
        self
    }

    /// Like [`Query::limit`], for limits that arrive as text
    pub fn limit_str(self, limit: &str) -> Result<Self> {
        Ok(self.limit(Limit::parse(limit)?))
    }

    /// Add a predicate; a row is kept only if every predicate accepts it
    ///
    /// All predicates run for every scanned row, even after one of them
    /// has rejected it.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row, &RowId) -> bool + 'a,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Add the row's own id to every result under the `id` column
    pub fn select_id(self) -> Self {
        self.select_id_as(DEFAULT_ID_COLUMN)
    }

    /// Add the row's own id to every result under `column`
    pub fn select_id_as(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    /// Keep rows inserted at or after `date`
    pub fn since(mut self, date: impl Into<DateLike>) -> Result<Self> {
        self.since = Some(parse_user_date(date)?);
        Ok(self)
    }

    /// Keep rows inserted at or before `date`
    pub fn until(mut self, date: impl Into<DateLike>) -> Result<Self> {
        self.until = Some(parse_user_date(date)?);
        Ok(self)
    }

    /// Lower time bound in epoch seconds, if set
    pub fn since_bound(&self) -> Option<i64> {
        self.since
    }

    /// Upper time bound in epoch seconds, if set
    pub fn until_bound(&self) -> Option<i64> {
        self.until
    }

    pub fn current_limit(&self) -> Limit {
        self.limit
    }

    /// Matching rows keyed by id, in scan order
    pub fn rows(&self) -> Result<RowSet> {
        let started = Instant::now();
        let store = self.table.store();

        let mut ids = self.table.index().list_all(store.as_ref())?;
        if let Some(since) = self.since {
            ids.retain(|id| id.epoch_seconds() >= since);
        }
        if let Some(until) = self.until {
            ids.retain(|id| id.epoch_seconds() <= until);
        }
        if self.limit.is_descending() {
            ids.reverse();
        }

        let max = self.limit.count();
        let mut rows = RowSet::new();
        let mut scanned = 0usize;

        for id in ids {
            let mut row = store.get(self.table.name(), id)?;
            scanned += 1;

            if !self.accepts(&row, &id) {
                continue;
            }
            if let Some(column) = &self.id_column {
                row.insert(column.clone(), Value::String(id.to_string()));
            }
            rows.push(id, row);

            if max.is_some_and(|max| rows.len() >= max) {
                break;
            }
        }

        observe::record_query(started.elapsed(), scanned, rows.len());
        tracing::debug!(
            "Query on '{}' scanned {} rows, returned {} in {:?}",
            self.table.name(),
            scanned,
            rows.len(),
            started.elapsed()
        );

        Ok(rows)
    }

    /// One column of every matching row, keyed by id
    ///
    /// Rows without the column yield `null` instead of an error.
    pub fn values(&self, column: &str) -> Result<ValueSet> {
        let rows = self.rows()?;
        Ok(rows.map_values(|mut row| row.remove(column).unwrap_or(Value::Null)))
    }

    /// Ids of matching rows
    ///
    /// Without filters this reads the id index directly and applies only the
    /// limit: `since` / `until` are not consulted on that path.
    pub fn ids(&self) -> Result<Vec<RowId>> {
        if self.filters.is_empty() {
            let store = self.table.store();
            self.table.index().list_bounded(store.as_ref(), self.limit)
        } else {
            Ok(self.rows()?.into_ids())
        }
    }

    fn accepts(&self, row: &Row, id: &RowId) -> bool {
        self.filters
            .iter()
            .fold(true, |pass, predicate| predicate(row, id) & pass)
    }
}

impl std::fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("table", &self.table.name())
            .field("limit", &self.limit)
            .field("since", &self.since)
            .field("until", &self.until)
            .field("filters", &self.filters.len())
            .field("id_column", &self.id_column)
            .finish()
    }
}
