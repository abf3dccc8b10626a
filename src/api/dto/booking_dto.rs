//! Booking DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Booking, BookingDraft};

/// Request body for `POST /bookings`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Hex id of the event to book.
    pub event_id: String,
    /// Attendee email.
    pub email: String,
}

impl From<CreateBookingRequest> for BookingDraft {
    fn from(r: CreateBookingRequest) -> Self {
        Self {
            event_id: r.event_id,
            email: r.email,
        }
    }
}

/// A stored booking as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Hex record id.
    pub id: String,
    /// Hex id of the booked event.
    pub event_id: String,
    /// Normalized email.
    pub email: String,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id.to_string(),
            event_id: b.event_id.to_string(),
            email: b.email,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
