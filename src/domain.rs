//! Core domain types for a single booking run
//!
//! Everything here is constructed when a run starts and dropped when it ends;
//! no state survives across runs except the externally stored credentials and
//! space preferences.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::dates;
use crate::error::{BookbotError, Result, config_invalid};

/// The schedulable location on the provider, holding the bookable spaces
#[derive(Debug, Clone)]
pub struct Venue {
    /// Provider instance base URL, e.g. `https://acme.skedda.com`
    pub base_url: String,
    /// Opaque venue identifier on the provider
    pub venue_id: String,
    /// IANA timezone the venue's calendar lives in
    pub timezone: Tz,
}

/// Session credentials for one authenticated user.
///
/// Immutable for the whole run; an expired credential is a terminal condition
/// and is never refreshed here.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Raw browser `Cookie` header value, forwarded verbatim
    pub cookie_header: String,
    /// Anti-forgery token the provider expects on every request
    pub verification_token: String,
    /// Opaque venue-user identifier
    pub user_id: String,
}

/// One entry in the ranked preference list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacePreference {
    pub id: String,
    pub name: String,
}

/// Ordered space preferences; first entry is the most preferred.
///
/// The order is the selection priority and is never re-sorted.
#[derive(Debug, Clone, Default)]
pub struct SpacePreferences(Vec<SpacePreference>);

impl SpacePreferences {
    /// Build a preference list, rejecting duplicate space ids
    pub fn new(entries: Vec<SpacePreference>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(config_invalid(format!(
                    "duplicate space id '{}' in spaces configuration",
                    entry.id
                )));
            }
        }
        Ok(Self(entries))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpacePreference> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 1-based rank of a space id in the preference order
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|p| p.id == id).map(|i| i + 1)
    }
}

/// The requested booking window on the target date.
///
/// Carries both the venue-local wall-clock times (what the provider's wire
/// format speaks) and the equivalent UTC instants (what the overlap test
/// compares). Both ends are half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredWindow {
    pub local_start: NaiveDateTime,
    pub local_end: NaiveDateTime,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DesiredWindow {
    /// Build the desired window for `date` from venue-local times of day
    pub fn on_date(date: NaiveDate, start: NaiveTime, end: NaiveTime, tz: Tz) -> Result<Self> {
        if start >= end {
            return Err(BookbotError::InvalidWindow {
                message: format!("start time {start} is not before end time {end}"),
            });
        }
        let local_start = date.and_time(start);
        let local_end = date.and_time(end);
        let to_instant = |local: NaiveDateTime| {
            dates::local_to_utc(local, tz).ok_or_else(|| BookbotError::InvalidWindow {
                message: format!("{local} does not exist in {tz} (daylight-saving gap)"),
            })
        };
        Ok(Self {
            local_start,
            local_end,
            start: to_instant(local_start)?,
            end: to_instant(local_end)?,
        })
    }

    /// Human-readable venue-local label, e.g. "08:30 to 17:00"
    pub fn local_label(&self) -> String {
        format!(
            "{} to {}",
            self.local_start.format("%H:%M"),
            self.local_end.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pref(id: &str, name: &str) -> SpacePreference {
        SpacePreference {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_preferences_keep_given_order() {
        let prefs =
            SpacePreferences::new(vec![pref("9", "Last id"), pref("1", "First id")]).unwrap();
        let ids: Vec<&str> = prefs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "1"]);
        assert_eq!(prefs.rank_of("1"), Some(2));
    }

    #[test]
    fn test_preferences_reject_duplicate_ids() {
        let result = SpacePreferences::new(vec![pref("7", "A"), pref("7", "B")]);
        assert!(matches!(result, Err(BookbotError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_window_rejects_inverted_times() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let result = DesiredWindow::on_date(
            date,
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            chrono_tz::UTC,
        );
        assert!(matches!(result, Err(BookbotError::InvalidWindow { .. })));
    }

    #[test]
    fn test_window_resolves_local_times_through_timezone() {
        let tz: Tz = "Australia/Melbourne".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let window = DesiredWindow::on_date(
            date,
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            tz,
        )
        .unwrap();
        // July is AEST (UTC+10)
        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2025, 6, 30, 22, 30, 0).unwrap()
        );
        assert_eq!(
            window.end,
            Utc.with_ymd_and_hms(2025, 7, 1, 7, 0, 0).unwrap()
        );
        assert_eq!(window.local_label(), "08:30 to 17:00");
    }
}
