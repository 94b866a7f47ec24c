use crate::error::{FstoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Row identifier - a time-encoded, strictly increasing decimal number
///
/// The value is `floor(unix_seconds * 10000) + sequence`, so dividing by
/// [`RowId::TICKS_PER_SECOND`] recovers the insertion instant in whole seconds.
/// The low four digits carry no time meaning.
///
/// Ids order by numeric magnitude and render as a plain decimal string,
/// which is also the on-disk key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(u64);

impl RowId {
    /// Sub-second ticks folded into every id
    pub const TICKS_PER_SECOND: u64 = 10_000;

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Build an id for a chosen instant, or `None` if it does not fit in a `u64`
    ///
    /// `sub_tick` occupies the low digits and is not range checked; values
    /// of `TICKS_PER_SECOND` or more spill into the next second.
    pub fn checked_from_parts(epoch_seconds: u64, sub_tick: u64) -> Option<Self> {
        epoch_seconds
            .checked_mul(Self::TICKS_PER_SECOND)?
            .checked_add(sub_tick)
            .map(Self)
    }

    /// Build an id for a chosen instant
    ///
    /// # Panics
    ///
    /// Panics if the id does not fit in a `u64`; see [`RowId::checked_from_parts`].
    pub fn from_parts(epoch_seconds: u64, sub_tick: u64) -> Self {
        match Self::checked_from_parts(epoch_seconds, sub_tick) {
            Some(id) => id,
            None => panic!("row id overflow: {epoch_seconds}s + {sub_tick} ticks"),
        }
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Insertion instant in whole seconds since the Unix epoch
    pub const fn epoch_seconds(&self) -> i64 {
        (self.0 / Self::TICKS_PER_SECOND) as i64
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RowId {
    type Err = FstoreError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FstoreError::InvalidId(s.to_string()));
        }
        s.parse::<u64>()
            .map(RowId)
            .map_err(|_| FstoreError::InvalidId(s.to_string()))
    }
}

impl From<u64> for RowId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Serialize for RowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
