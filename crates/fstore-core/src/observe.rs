//! Optional metrics instrumentation for fstore.
//!
//! When the `observe` feature is enabled, inserts, index loads and query
//! executions emit counters, histograms and gauges via the [`metrics`]
//! crate. A downstream application must install a metrics recorder to
//! collect the data.
//!
//! When the feature is **not** enabled every function in this module is a
//! zero-cost no-op.

/// Record a row insert.
///
/// - `fstore.rows.inserted_total` – counter
#[inline]
pub fn record_insert() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("fstore.rows.inserted_total").increment(1);
    }
}

/// Record an id index population from storage.
///
/// - `fstore.index.loads_total` – counter
/// - `fstore.index.load_duration_seconds` – histogram
/// - `fstore.index.loaded_ids` – histogram of ids found
#[inline]
pub fn record_index_load(duration: std::time::Duration, ids: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("fstore.index.loads_total").increment(1);
        metrics::histogram!("fstore.index.load_duration_seconds").record(duration.as_secs_f64());
        metrics::histogram!("fstore.index.loaded_ids").record(ids as f64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (duration, ids);
    }
}

/// Set the cached id count gauge for a table.
///
/// - `fstore.index.size` – gauge with `table` label
#[inline]
pub fn set_index_size(table: &str, size: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::gauge!("fstore.index.size", "table" => table.to_string()).set(size as f64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (table, size);
    }
}

/// Record a query execution.
///
/// - `fstore.query.executions_total` – counter
/// - `fstore.query.duration_seconds` – histogram
/// - `fstore.query.rows_scanned_total` – counter
/// - `fstore.query.rows_returned_total` – counter
#[inline]
pub fn record_query(duration: std::time::Duration, rows_scanned: usize, rows_returned: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("fstore.query.executions_total").increment(1);
        metrics::histogram!("fstore.query.duration_seconds").record(duration.as_secs_f64());
        metrics::counter!("fstore.query.rows_scanned_total").increment(rows_scanned as u64);
        metrics::counter!("fstore.query.rows_returned_total").increment(rows_returned as u64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (duration, rows_scanned, rows_returned);
    }
}
