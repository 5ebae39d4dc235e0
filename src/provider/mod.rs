//! Provider boundary: the read/write contract against the scheduling service.
//!
//! The engine only ever sees this trait; production wires in the
//! reqwest-backed [`SkeddaClient`], tests wire in in-memory fakes.

pub mod skedda;

pub use skedda::SkeddaClient;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::DesiredWindow;
use crate::error::Result;

/// One existing booking returned by the provider, normalized to UTC instants.
///
/// A booking may span several spaces; it occupies all of them.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub spaces: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Outcome of a single booking write, classified at the wire boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingReply {
    /// Provider confirmed the booking was created
    Created,
    /// The slot was taken between selection and submission
    Conflict,
    /// Session cookies or verification token no longer valid
    AuthRejected,
    /// Provider rejected the request as invalid
    Rejected { reason: String },
}

/// Read/write access to the scheduling provider for one venue.
pub trait BookingProvider {
    /// Fetch all existing bookings for `date`.
    ///
    /// An empty Vec means the day was queried successfully and nothing is
    /// booked. Authentication rejection, transport failure, and a response
    /// body that does not match the expected shape are all errors, never an
    /// empty result.
    fn bookings_for(&self, date: NaiveDate) -> Result<Vec<BookingRecord>>;

    /// Issue exactly one booking-creation request for `space_id` over
    /// `window` and classify the provider's answer.
    ///
    /// The remote state changes only on [`BookingReply::Created`].
    fn create_booking(&self, space_id: &str, window: &DesiredWindow) -> Result<BookingReply>;
}
