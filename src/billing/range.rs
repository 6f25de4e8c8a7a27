//! Date-range filter for the bill listing.
//!
//! Turns the optional `start` / `end` query parameters into a half-open
//! interval `[start, end)` over `created_at`:
//!
//! ```text
//! start=2025-09-01 end=2025-09-30  ->  [2025-09-01T00:00Z, 2025-10-01T00:00Z)
//! start=2025-09-01                 ->  [2025-09-01T00:00Z, now)
//! end=2025-09-30                   ->  [2025-01-01T00:00Z, 2025-10-01T00:00Z)
//! (neither)                        ->  no filter, full listing
//! ```

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::RangeError;

/// First year of data; the start boundary when only `end` is supplied.
pub const REFERENCE_YEAR: i32 = 2025;

/// Accepted calendar date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw query parameters of `GET /bills`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeParams {
    /// First day included, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Last day included, `YYYY-MM-DD`.
    pub end: Option<String>,
}

/// Outcome of parsing the range parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// Neither boundary given: list everything.
    All,
    /// Records with `start <= created_at < end`.
    Between {
        /// Inclusive lower bound.
        start: DateTime<Utc>,
        /// Exclusive upper bound.
        end: DateTime<Utc>,
    },
}

impl DateRange {
    /// Check whether a creation instant falls in the range.
    pub fn contains(&self, created_at: DateTime<Utc>) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Between { start, end } => *start <= created_at && created_at < *end,
        }
    }
}

/// Midnight UTC on January 1 of [`REFERENCE_YEAR`].
pub fn epoch_floor() -> DateTime<Utc> {
    midnight(NaiveDate::from_ymd_opt(REFERENCE_YEAR, 1, 1).unwrap_or_default())
}

/// Parse `start` / `end` into a [`DateRange`].
///
/// Empty strings count as absent. `start` is validated before `end`.
pub fn parse_range(
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateRange, RangeError> {
    let start = start.filter(|s| !s.is_empty());
    let end = end.filter(|s| !s.is_empty());

    if start.is_none() && end.is_none() {
        return Ok(DateRange::All);
    }

    let start = match start {
        Some(raw) => midnight(parse_day(raw, "start")?),
        None => epoch_floor(),
    };

    let end = match end {
        Some(raw) => {
            let day = parse_day(raw, "end")?;
            let next = day
                .checked_add_days(Days::new(1))
                .ok_or(RangeError::InvalidDateFormat { param: "end" })?;
            midnight(next)
        }
        None => now,
    };

    Ok(DateRange::Between { start, end })
}

fn parse_day(raw: &str, param: &'static str) -> Result<NaiveDate, RangeError> {
    let invalid = RangeError::InvalidDateFormat { param };

    // chrono tolerates unpadded fields; only the exact ten-character form is valid.
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid);
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid)
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
