//! Target-date resolution in the venue timezone.
//!
//! All date arithmetic is calendar arithmetic on the venue-local date, never a
//! fixed multiple of 24 hours, so a daylight-saving transition inside the
//! look-ahead window cannot shift the target date.

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{BookbotError, Result};

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| BookbotError::UnknownTimezone {
        name: name.to_string(),
    })
}

/// Resolve the booking target date: the local calendar date in `tz` plus
/// `days_ahead` calendar days.
///
/// `days_ahead = 0` targets today in venue-local time, which may differ from
/// the UTC date around midnight.
pub fn resolve_target_date(now_utc: DateTime<Utc>, tz: Tz, days_ahead: u32) -> Result<NaiveDate> {
    let today = now_utc.with_timezone(&tz).date_naive();
    today
        .checked_add_days(Days::new(u64::from(days_ahead)))
        .ok_or_else(|| BookbotError::ConfigInvalid {
            message: format!("days_ahead {days_ahead} overflows the calendar"),
        })
}

/// Map a venue-local wall-clock time to a UTC instant.
///
/// Times that occur twice on the day daylight saving ends resolve to the
/// earlier instant. `None` means the time falls inside a daylight-saving gap
/// and does not exist in `tz`.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}
