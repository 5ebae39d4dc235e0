//! Point-in-time occupancy for one venue date.
//!
//! The snapshot is fetched exactly once per run and never refreshed between
//! candidate evaluations; a race with another user booking the same slot
//! surfaces as a conflict on the write, not as a stale read here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::provider::BookingRecord;

/// One existing booking's time span, as UTC instants, half-open `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupiedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// All existing bookings for the target date, keyed by space id.
///
/// A space id absent from the map has zero occupied intervals and is fully
/// free. An empty snapshot always means "queried successfully, nothing
/// booked"; fetch failures never produce one.
#[derive(Debug, Default)]
pub struct OccupancySnapshot {
    by_space: HashMap<String, Vec<OccupiedInterval>>,
    bookings: usize,
}

impl OccupancySnapshot {
    /// Shape provider booking records into per-space occupied intervals.
    ///
    /// A record spanning several spaces occupies every one of them.
    pub fn from_records(records: Vec<BookingRecord>) -> Self {
        let mut snapshot = Self::default();
        for record in records {
            snapshot.bookings += 1;
            for space in record.spaces {
                snapshot.insert(
                    space,
                    OccupiedInterval {
                        start: record.start,
                        end: record.end,
                    },
                );
            }
        }
        snapshot
    }

    pub fn insert(&mut self, space_id: impl Into<String>, interval: OccupiedInterval) {
        self.by_space.entry(space_id.into()).or_default().push(interval);
    }

    /// Occupied intervals for a space; empty slice when the space is free
    pub fn intervals_for(&self, space_id: &str) -> &[OccupiedInterval] {
        self.by_space.get(space_id).map_or(&[], Vec::as_slice)
    }

    /// Number of bookings the provider returned for the date
    pub fn booking_count(&self) -> usize {
        self.bookings
    }
}
