//! The booking engine: one run, one snapshot, one attempt.
//!
//! A run walks Init → date resolved → snapshot fetched → selected →
//! attempted, short-circuiting to a terminal outcome at the first failure.
//! The snapshot is read exactly once and at most one booking write is issued;
//! a conflict on the write ends the run without falling back to the next
//! preferred space, keeping the at-most-one-attempt guarantee.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::availability;
use crate::dates;
use crate::domain::{DesiredWindow, SpacePreference, SpacePreferences};
use crate::error::{BookbotError, Result};
use crate::provider::{BookingProvider, BookingReply};
use crate::snapshot::OccupancySnapshot;

/// Terminal outcome of a run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Booking write confirmed by the provider
    Booked { space: SpacePreference, rank: usize },
    /// Dry run: the space that would have been booked
    Selected { space: SpacePreference, rank: usize },
    /// Every preferred space is occupied for the window; a normal outcome,
    /// not a failure
    AllTaken,
}

/// What a run saw and decided, for operator-facing reporting
#[derive(Debug)]
pub struct RunReport {
    pub target_date: NaiveDate,
    pub window: DesiredWindow,
    pub existing_bookings: usize,
    pub outcome: RunOutcome,
}

/// Composes date resolution, occupancy fetch, selection, and the single
/// booking attempt over any [`BookingProvider`].
pub struct BookingEngine<'a, P: BookingProvider> {
    provider: &'a P,
    preferences: &'a SpacePreferences,
    timezone: Tz,
    days_ahead: u32,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl<'a, P: BookingProvider> BookingEngine<'a, P> {
    pub fn new(
        provider: &'a P,
        preferences: &'a SpacePreferences,
        timezone: Tz,
        days_ahead: u32,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            provider,
            preferences,
            timezone,
            days_ahead,
            start_time,
            end_time,
        }
    }

    /// Run one booking attempt
    pub fn run(&self, now_utc: DateTime<Utc>) -> Result<RunReport> {
        self.execute(now_utc, true)
    }

    /// Evaluate availability and selection without issuing the booking write
    pub fn preview(&self, now_utc: DateTime<Utc>) -> Result<RunReport> {
        self.execute(now_utc, false)
    }

    fn execute(&self, now_utc: DateTime<Utc>, commit: bool) -> Result<RunReport> {
        let target_date = dates::resolve_target_date(now_utc, self.timezone, self.days_ahead)?;
        let window =
            DesiredWindow::on_date(target_date, self.start_time, self.end_time, self.timezone)?;

        let records = self.provider.bookings_for(target_date)?;
        let snapshot = OccupancySnapshot::from_records(records);
        let existing_bookings = snapshot.booking_count();

        let report = |outcome| RunReport {
            target_date,
            window: window.clone(),
            existing_bookings,
            outcome,
        };

        let Some(space) = availability::select_space(self.preferences, &window, &snapshot) else {
            return Ok(report(RunOutcome::AllTaken));
        };
        let rank = self.preferences.rank_of(&space.id).unwrap_or(0);

        if !commit {
            return Ok(report(RunOutcome::Selected {
                space: space.clone(),
                rank,
            }));
        }

        match self.provider.create_booking(&space.id, &window)? {
            BookingReply::Created => Ok(report(RunOutcome::Booked {
                space: space.clone(),
                rank,
            })),
            BookingReply::Conflict => Err(BookbotError::BookingConflict {
                space: space.name.clone(),
            }),
            BookingReply::AuthRejected => Err(BookbotError::AuthExpired),
            BookingReply::Rejected { reason } => Err(BookbotError::BookingRejected { reason }),
        }
    }
}
