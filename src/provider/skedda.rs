//! Skedda HTTP client: the production [`BookingProvider`].
//!
//! Speaks the Skedda session model: every request carries the browser session
//! cookies plus the anti-forgery token header. Auth expiry is detected on
//! both the read and the write call and surfaces as
//! [`BookbotError::AuthExpired`], never as an empty result.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue, ORIGIN,
    USER_AGENT,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{BookingProvider, BookingRecord, BookingReply};
use crate::dates;
use crate::domain::{Credential, DesiredWindow, Venue};
use crate::error::{BookbotError, Result, config_invalid, provider_response, transport};

const VERIFICATION_HEADER: &str = "x-skedda-requestverificationtoken";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP client bound to one venue and one credential set
pub struct SkeddaClient {
    client: Client,
    headers: HeaderMap,
    venue: Venue,
    user_id: String,
}

impl SkeddaClient {
    pub fn new(venue: Venue, credential: Credential) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| transport(format!("failed to build HTTP client: {e}")))?;
        let headers = session_headers(&venue, &credential)?;
        Ok(Self {
            client,
            headers,
            venue,
            user_id: credential.user_id,
        })
    }
}

impl BookingProvider for SkeddaClient {
    fn bookings_for(&self, date: NaiveDate) -> Result<Vec<BookingRecord>> {
        let url = format!("{}/bookingslists", self.venue.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .query(&[
                ("start", format!("{date}T00:00:00")),
                ("end", format!("{date}T23:59:59.999")),
            ])
            .send()
            .map_err(|e| transport(format!("bookings read failed: {e}")))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(BookbotError::AuthExpired);
            }
            status => {
                return Err(transport(format!("bookings read returned HTTP {status}")));
            }
        }

        let body: BookingsListBody = response.json().map_err(|e| {
            provider_response(format!("bookings list body has an unexpected shape: {e}"))
        })?;
        body.bookings
            .into_iter()
            .map(|wire| record_from_wire(wire, self.venue.timezone))
            .collect()
    }

    fn create_booking(&self, space_id: &str, window: &DesiredWindow) -> Result<BookingReply> {
        let url = format!("{}/bookings", self.venue.base_url);
        let payload = booking_payload(&self.venue.venue_id, &self.user_id, space_id, window);
        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(&payload)
            .send()
            .map_err(|e| transport(format!("booking write failed: {e}")))?;

        match response.status() {
            StatusCode::OK => Ok(BookingReply::Created),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(BookingReply::AuthRejected),
            StatusCode::CONFLICT => Ok(BookingReply::Conflict),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().unwrap_or_default();
                Ok(classify_rejection(rejection_detail(&body)))
            }
            status => Err(transport(format!("booking write returned HTTP {status}"))),
        }
    }
}

/// Headers shared by both provider calls: a browser-like base set plus the
/// session cookies and anti-forgery token.
fn session_headers(venue: &Venue, credential: &Credential) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        ),
    );
    headers.insert(
        ORIGIN,
        HeaderValue::from_str(&venue.base_url)
            .map_err(|_| config_invalid("base_url contains characters not valid in a header"))?,
    );
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&credential.cookie_header)
            .map_err(|_| config_invalid("cookies contain characters not valid in a header"))?,
    );
    headers.insert(
        HeaderName::from_static(VERIFICATION_HEADER),
        HeaderValue::from_str(&credential.verification_token)
            .map_err(|_| config_invalid("token contains characters not valid in a header"))?,
    );
    Ok(headers)
}

#[derive(Debug, Deserialize)]
struct BookingsListBody {
    bookings: Vec<WireBooking>,
}

/// A booking as the list endpoint returns it. Spaces arrive either as an
/// array under `spaces`, a scalar under `spaces`, a scalar under `space`, or
/// a mix; ids may be JSON strings or numbers.
#[derive(Debug, Deserialize)]
struct WireBooking {
    #[serde(default)]
    spaces: Option<Value>,
    #[serde(default)]
    space: Option<Value>,
    start: String,
    end: String,
}

fn record_from_wire(wire: WireBooking, tz: Tz) -> Result<BookingRecord> {
    let mut spaces = Vec::new();
    match wire.spaces {
        Some(Value::Array(entries)) => {
            for entry in &entries {
                spaces.push(scalar_space_id(entry)?);
            }
        }
        Some(ref scalar) => spaces.push(scalar_space_id(scalar)?),
        None => {}
    }
    if let Some(ref scalar) = wire.space {
        spaces.push(scalar_space_id(scalar)?);
    }
    Ok(BookingRecord {
        spaces,
        start: parse_instant(&wire.start, tz)?,
        end: parse_instant(&wire.end, tz)?,
    })
}

fn scalar_space_id(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(provider_response(format!(
            "booking entry has a non-scalar space id: {other}"
        ))),
    }
}

/// Parse a booking timestamp into a UTC instant.
///
/// The list endpoint mixes formats: RFC 3339 with `Z` or an explicit offset,
/// and venue-local naive datetimes. Naive values are interpreted in the venue
/// timezone.
fn parse_instant(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| provider_response(format!("unparsable booking timestamp: {raw}")))?;
    dates::local_to_utc(naive, tz)
        .ok_or_else(|| provider_response(format!("booking timestamp {raw} does not exist in {tz}")))
}

/// The full creation payload the provider expects. Most fields are fixed
/// boilerplate the booking form always submits.
fn booking_payload(venue_id: &str, user_id: &str, space_id: &str, window: &DesiredWindow) -> Value {
    json!({
        "booking": {
            "endOfLastOccurrence": null,
            "title": null,
            "price": 0,
            "chargeTransactionId": null,
            "invoiceId": null,
            "lockInMargin": null,
            "stripPrivateEventDetails": false,
            "unrecognizedOrganizer": false,
            "type": 1,
            "paymentStatus": 0,
            "recurrenceRule": null,
            "decoupleDate": null,
            "createdDate": null,
            "customFields": [],
            "piId": null,
            "checkInAudits": null,
            "allowInviteOthers": false,
            "addConference": false,
            "hideAttendees": true,
            "availabilityStatus": 1,
            "syncType": null,
            "attendees": [],
            "start": window.local_start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "end": window.local_end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "arbitraryerrors": null,
            "spaces": [space_id],
            "venueuser": user_id,
            "venue": venue_id,
            "decoupleBooking": null
        }
    })
}

/// Pull the first error detail out of a 422 body, tolerating absent fields
fn rejection_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        errors: Vec<ErrorEntry>,
    }
    #[derive(Deserialize)]
    struct ErrorEntry {
        #[serde(default)]
        detail: Option<String>,
        #[serde(default)]
        title: Option<String>,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.errors.into_iter().next())
        .and_then(|e| e.detail.or(e.title))
        .unwrap_or_else(|| "validation error".to_string())
}

/// Skedda reports a lost race as a 422 whose detail says the space is taken;
/// everything else on 422 is a genuine validation rejection.
fn classify_rejection(detail: String) -> BookingReply {
    let lowered = detail.to_lowercase();
    if lowered.contains("already booked")
        || lowered.contains("no longer available")
        || lowered.contains("unavailable")
    {
        BookingReply::Conflict
    } else {
        BookingReply::Rejected { reason: detail }
    }
}
