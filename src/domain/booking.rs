//! Booking records and email normalization.
//!
//! The existence check against the referenced event needs storage and
//! lives in [`crate::service::BookingService`]; everything here is pure.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::RecordId;
use crate::error::{AppError, FieldError};

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Trims and lower-cases an email address.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns `true` if `email` has the `local@domain.tld` shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Candidate booking as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    /// Hex id of the event being booked.
    pub event_id: String,
    /// Attendee email, in any case and with any surrounding whitespace.
    pub email: String,
}

impl BookingDraft {
    /// Validates the draft and produces the booking to persist.
    ///
    /// Does not check that the event exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidEmail`] for a malformed email and
    /// [`AppError::Validation`] for an `eventId` that is not an object id.
    pub fn into_booking(self, now: DateTime<Utc>) -> Result<Booking, AppError> {
        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(AppError::InvalidEmail(self.email));
        }
        let event_id: RecordId = self.event_id.parse().map_err(|_| {
            AppError::Validation(vec![FieldError::new(
                "eventId",
                format!("eventId {:?} is not a valid record id", self.event_id),
            )])
        })?;

        Ok(Booking {
            id: RecordId::new(),
            event_id,
            email,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Record identifier.
    pub id: RecordId,
    /// The booked event.
    pub event_id: RecordId,
    /// Trimmed, lower-cased email.
    pub email: String,
    /// Insert time.
    pub created_at: DateTime<Utc>,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}
