//! Row id minting
//!
//! Ids are `floor(unix_seconds * 10000) + counter`, where the counter starts
//! at zero for every minter and only ever grows. Two ids minted in the same
//! sub-second tick therefore still differ, and ids from one minter are
//! strictly increasing in mint order.
//!
//! Minters are process-wide per (root, table): every `Fstore` opened on the
//! same directory in one process draws from the same counter.

use fstore_core::{FstoreError, Result, RowId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type MinterKey = (PathBuf, String);

static MINTERS: OnceLock<Mutex<HashMap<MinterKey, Arc<IdMinter>>>> = OnceLock::new();

/// Microseconds per id tick (1/10000 s)
const MICROS_PER_TICK: u128 = 100;

#[derive(Debug, Default)]
struct MinterState {
    counter: u64,
    last: Option<RowId>,
}

/// Mints time-encoded row ids for one table
///
/// The counter lives in memory only: it resets when the process restarts,
/// and two processes writing the same table can mint the same id.
#[derive(Debug, Default)]
pub struct IdMinter {
    state: Mutex<MinterState>,
}

impl IdMinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint an id from the current wall-clock time
    pub fn mint(&self) -> Result<RowId> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| FstoreError::Clock(e.to_string()))?;
        Ok(self.mint_at(since_epoch))
    }

    /// Mint an id for a given time since the Unix epoch
    pub fn mint_at(&self, since_epoch: Duration) -> RowId {
        let ticks = u64::try_from(since_epoch.as_micros() / MICROS_PER_TICK).unwrap_or(u64::MAX);

        let mut state = self.state.lock();
        let mut value = ticks.saturating_add(state.counter);
        // A clock stepping backwards must not break ordering
        if let Some(last) = state.last {
            if value <= last.value() {
                value = last.value() + 1;
            }
        }
        state.counter += 1;

        let id = RowId::new(value);
        state.last = Some(id);
        id
    }

    /// Number of ids minted so far
    pub fn minted(&self) -> u64 {
        self.state.lock().counter
    }
}

/// The process-wide minter for `table` under `root`
///
/// `root` is canonicalized, so different spellings of one directory share a
/// minter. A root that cannot be canonicalized is used as given.
pub fn shared_minter(root: &Path, table: &str) -> Arc<IdMinter> {
    let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let minters = MINTERS.get_or_init(|| Mutex::new(HashMap::new()));
    minters
        .lock()
        .entry((root, table.to_string()))
        .or_insert_with(|| Arc::new(IdMinter::new()))
        .clone()
}

/// Insertion instant of an id, in whole seconds since the Unix epoch
pub fn to_epoch_seconds(id: RowId) -> i64 {
    id.epoch_seconds()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_encodes_time() {
        let minter = IdMinter::new();
        let id = minter.mint_at(Duration::from_micros(1_700_000_000_123_456));
        // 1_700_000_000.123456 s -> 17_000_000_001_234 ticks, counter 0
        assert_eq!(id, RowId::new(17_000_000_001_234));
        assert_eq!(to_epoch_seconds(id), 1_700_000_000);
    }

    #[test]
    fn test_same_instant_is_strictly_increasing() {
        let minter = IdMinter::new();
        let at = Duration::from_secs(1_700_000_000);
        let ids: Vec<RowId> = (0..100).map(|_| minter.mint_at(at)).collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids[0], RowId::new(17_000_000_000_000));
        assert_eq!(ids[99], RowId::new(17_000_000_000_099));
        assert_eq!(minter.minted(), 100);
    }

    #[test]
    fn test_clock_going_backwards() {
        let minter = IdMinter::new();
        let first = minter.mint_at(Duration::from_secs(1_700_000_010));
        let second = minter.mint_at(Duration::from_secs(1_700_000_000));
        assert!(second > first);
    }

    #[test]
    fn test_shared_minter_per_root_and_table() {
        let temp = tempfile::tempdir().unwrap();
        let a = shared_minter(temp.path(), "t");
        let b = shared_minter(&temp.path().join("."), "t");
        let other = shared_minter(temp.path(), "u");

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[test]
    fn test_mint_now_round_trips_to_current_second() {
        let before = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
        let id = IdMinter::new().mint().unwrap();
        let after = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;

        let secs = id.epoch_seconds();
        assert!(secs >= before && secs <= after);
    }
}
