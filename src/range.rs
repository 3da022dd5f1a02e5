//! Inclusive calendar-date filtering for messages.
//!
//! A [`DateRange`] is a closed `[from, to]` interval of calendar dates with
//! no time-of-day component. A message belongs to the range when its
//! timestamp, truncated to local midnight, falls inside the interval —
//! messages exactly on either boundary are included.
//!
//! The range is always a well-typed pair of [`NaiveDate`]s; string inputs
//! are normalized once at the system boundary (CLI arguments, persisted
//! config) and never reach the aggregation core.

use chrono::{Local, NaiveDate, TimeZone};

use crate::error::{ArchiveError, Result};

/// An inclusive `[from, to]` pair of calendar dates.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use msgtally::range::DateRange;
///
/// # fn main() -> msgtally::error::Result<()> {
/// let range = DateRange::parse("2023-01-01", "2023-12-31")?;
/// assert!(range.contains(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()));
/// assert!(range.contains(range.from)); // boundaries are inclusive
/// assert!(range.contains(range.to));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First included calendar date.
    pub from: NaiveDate,
    /// Last included calendar date.
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a range from two dates.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Parses a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidDate`] if either string does not parse.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: parse_date(from)?,
            to: parse_date(to)?,
        })
    }

    /// Returns `true` if `date` lies inside the closed interval.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Returns `true` if the message timestamp falls inside the range.
    ///
    /// The calendar date is computed by truncating the epoch-millisecond
    /// timestamp to local midnight. Timestamps outside chrono's
    /// representable range never match.
    pub fn contains_timestamp_millis(&self, timestamp_ms: i64) -> bool {
        match Local.timestamp_millis_opt(timestamp_ms).single() {
            Some(dt) => self.contains(dt.date_naive()),
            None => false,
        }
    }
}

/// Parses a `YYYY-MM-DD` string into a [`NaiveDate`].
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| ArchiveError::invalid_date(input))
}
