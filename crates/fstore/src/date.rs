//! User-facing date handling
//!
//! Turns the loosely typed dates callers pass to `since` / `until` into
//! epoch seconds, and renders the derived time of an id for display.
//!
//! Accepted text, tried in order:
//! - all digits: already epoch seconds (`"1700000000"`)
//! - `DD/MM/YYYY`, at local midnight (`"25/12/2023"`)
//! - RFC 3339 and RFC 2822 timestamps
//! - `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]` in local time
//! - `now`, `today`, `midnight`, `yesterday`, `tomorrow`
//! - relative offsets such as `-10 days`, `+1 week 2 days`, `3 hours ago`,
//!   optionally after one of the keywords above (`today -2 days`)

use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use fstore_core::{FstoreError, Result, RowId};
use std::time::SystemTime;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A date supplied by a caller
#[derive(Debug, Clone, PartialEq)]
pub enum DateLike {
    /// Free-form text, see the module docs for accepted shapes
    Text(String),
    /// An absolute instant
    Instant(DateTime<Utc>),
    /// A wall-clock time in the local time zone
    Naive(NaiveDateTime),
}

impl From<&str> for DateLike {
    fn from(value: &str) -> Self {
        DateLike::Text(value.to_string())
    }
}

impl From<String> for DateLike {
    fn from(value: String) -> Self {
        DateLike::Text(value)
    }
}

impl From<&String> for DateLike {
    fn from(value: &String) -> Self {
        DateLike::Text(value.clone())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateLike {
    fn from(value: DateTime<Tz>) -> Self {
        DateLike::Instant(value.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for DateLike {
    fn from(value: NaiveDateTime) -> Self {
        DateLike::Naive(value)
    }
}

impl From<NaiveDate> for DateLike {
    fn from(value: NaiveDate) -> Self {
        DateLike::Naive(value.and_time(NaiveTime::MIN))
    }
}

impl From<SystemTime> for DateLike {
    fn from(value: SystemTime) -> Self {
        DateLike::Instant(DateTime::<Utc>::from(value))
    }
}

/// Parse a caller date into epoch seconds, relative to the current time
pub fn parse_user_date(input: impl Into<DateLike>) -> Result<i64> {
    parse_user_date_at(input, Local::now())
}

/// Parse a caller date into epoch seconds, resolving relative forms against `now`
pub fn parse_user_date_at(input: impl Into<DateLike>, now: DateTime<Local>) -> Result<i64> {
    match input.into() {
        DateLike::Instant(dt) => Ok(dt.timestamp()),
        DateLike::Naive(naive) => Ok(local_from_naive(naive, &naive.to_string())?.timestamp()),
        DateLike::Text(text) => parse_text(&text, now),
    }
}

/// Format the derived time of an id with a strftime-style pattern, in local time
pub fn format_id_date(format: &str, id: RowId) -> Result<String> {
    format_epoch(format, id.epoch_seconds())
}

/// Format epoch seconds with a strftime-style pattern, in local time
pub fn format_epoch(format: &str, epoch_seconds: i64) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(FstoreError::InvalidFormat(format.to_string()));
    }

    let instant = DateTime::from_timestamp(epoch_seconds, 0)
        .ok_or_else(|| FstoreError::InvalidDate(epoch_seconds.to_string()))?;
    Ok(instant
        .with_timezone(&Local)
        .format_with_items(items.into_iter())
        .to_string())
}

fn invalid(input: &str) -> FstoreError {
    FstoreError::InvalidDate(input.to_string())
}

fn local_from_naive(naive: NaiveDateTime, input: &str) -> Result<DateTime<Local>> {
    // Ambiguous local times (DST fall-back) resolve to the earlier instant
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| invalid(input))
}

fn local_midnight(date: NaiveDate, input: &str) -> Result<DateTime<Local>> {
    local_from_naive(date.and_time(NaiveTime::MIN), input)
}

fn parse_text(input: &str, now: DateTime<Local>) -> Result<i64> {
    let text = input.trim();
    if text.is_empty() {
        return Err(invalid(input));
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse::<i64>().map_err(|_| invalid(input));
    }

    if let Some(date) = parse_day_month_year(text) {
        let date = date.ok_or_else(|| invalid(input))?;
        return Ok(local_midnight(date, input)?.timestamp());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt.timestamp());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(local_from_naive(naive, input)?.timestamp());
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(local_midnight(date, input)?.timestamp());
        }
    }

    parse_relative(text, now)?
        .map(|dt| dt.timestamp())
        .ok_or_else(|| invalid(input))
}

/// Recognize `DD/MM/YYYY`
///
/// Returns `None` when the text does not have that shape, and `Some(None)`
/// when it does but names an impossible day such as `31/02/2024`.
fn parse_day_month_year(text: &str) -> Option<Option<NaiveDate>> {
    let mut parts = text.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let shaped = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !(shaped(day, 1, 2) && shaped(month, 1, 2) && shaped(year, 4, 4)) {
        return None;
    }

    let day = day.parse().ok()?;
    let month = month.parse().ok()?;
    let year = year.parse().ok()?;
    Some(NaiveDate::from_ymd_opt(year, month, day))
}

enum Step {
    Span(Duration),
    Months(i64),
}

/// Keywords and relative offsets
///
/// `Ok(None)` means the text is not in this grammar; `Err` means it is but
/// the result falls outside the representable range.
fn parse_relative(text: &str, now: DateTime<Local>) -> Result<Option<DateTime<Local>>> {
    let lower = text.to_ascii_lowercase();
    let mut tokens: Vec<&str> = lower.split_whitespace().collect();

    let ago = tokens.last() == Some(&"ago");
    if ago {
        tokens.pop();
    }

    let mut base = now;
    let mut anchored = false;
    let mut rest = tokens.as_slice();
    if let Some((first, tail)) = rest.split_first() {
        let today = || local_midnight(now.date_naive(), text);
        let keyword = match *first {
            "now" => Some(now),
            "today" | "midnight" => Some(today()?),
            "yesterday" => Some(today()? - Duration::days(1)),
            "tomorrow" => Some(today()? + Duration::days(1)),
            _ => None,
        };
        if let Some(keyword) = keyword {
            if ago {
                return Ok(None);
            }
            base = keyword;
            anchored = true;
            rest = tail;
        }
    }

    if rest.is_empty() {
        return Ok(anchored.then_some(base));
    }

    let mut steps = Vec::new();
    let mut i = 0;
    while i < rest.len() {
        let token = rest[i];
        let digits_end = token
            .char_indices()
            .find(|&(idx, c)| !(c.is_ascii_digit() || (idx == 0 && (c == '+' || c == '-'))))
            .map(|(idx, _)| idx)
            .unwrap_or(token.len());

        let Ok(amount) = token[..digits_end].parse::<i64>() else {
            return Ok(None);
        };
        let unit = if digits_end < token.len() {
            &token[digits_end..]
        } else {
            i += 1;
            match rest.get(i) {
                Some(unit) => *unit,
                None => return Ok(None),
            }
        };
        let amount = if ago { -amount } else { amount };

        let Some(step) = unit_step(amount, unit) else {
            return Ok(None);
        };
        steps.push(step);
        i += 1;
    }

    let mut at = base;
    for step in steps {
        let next = match step {
            Step::Span(span) => at.checked_add_signed(span),
            Step::Months(n) if n >= 0 => at.checked_add_months(Months::new(months(n)?)),
            Step::Months(n) => at.checked_sub_months(Months::new(months(-n)?)),
        };
        at = next.ok_or_else(|| invalid(text))?;
    }

    Ok(Some(at))
}

fn months(n: i64) -> Result<u32> {
    u32::try_from(n).map_err(|_| FstoreError::InvalidDate(format!("{} months", n)))
}

fn unit_step(amount: i64, unit: &str) -> Option<Step> {
    let seconds_per = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        "month" | "months" => return Some(Step::Months(amount)),
        "y" | "year" | "years" => return amount.checked_mul(12).map(Step::Months),
        _ => return None,
    };
    let seconds = amount.checked_mul(seconds_per)?;
    Duration::try_seconds(seconds).map(Step::Span)
}
