//! Availability evaluation and preference-ordered selection.

use crate::domain::{DesiredWindow, SpacePreference, SpacePreferences};
use crate::snapshot::OccupancySnapshot;

/// Whether a space is bookable for the desired window.
///
/// Half-open overlap test: `[s1, e1)` and `[s2, e2)` overlap iff
/// `s1 < e2 && s2 < e1`, so back-to-back bookings that touch at a boundary do
/// not conflict. A space with no intervals in the snapshot is fully free.
pub fn is_available(
    space_id: &str,
    window: &DesiredWindow,
    snapshot: &OccupancySnapshot,
) -> bool {
    snapshot
        .intervals_for(space_id)
        .iter()
        .all(|occupied| !(window.start < occupied.end && occupied.start < window.end))
}

/// First bookable space in preference order, or `None` when every preferred
/// space is occupied.
///
/// Deterministic: identical inputs always select the same space. The caller's
/// ordering is the only tie-break; nothing is re-sorted or randomized.
pub fn select_space<'a>(
    preferences: &'a SpacePreferences,
    window: &DesiredWindow,
    snapshot: &OccupancySnapshot,
) -> Option<&'a SpacePreference> {
    preferences
        .iter()
        .find(|preference| is_available(&preference.id, window, snapshot))
}
