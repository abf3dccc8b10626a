//! BSON document shapes for the `events` and `bookings` collections.
//!
//! Field names are camelCase on disk (`eventId`, `createdAt`, ...).

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::domain::{Booking, Event};
use crate::error::AppError;

/// Collection holding [`EventDocument`]s.
pub const EVENTS: &str = "events";

/// Collection holding [`BookingDocument`]s.
pub const BOOKINGS: &str = "bookings";

/// A stored document from the `events` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct EventDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

/// A stored document from the `bookings` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDocument {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// `_id` of the booked event.
    pub event_id: ObjectId,
    /// Normalized email.
    pub email: String,
    /// Insert time.
    pub created_at: mongodb::bson::DateTime,
    /// Last write time.
    pub updated_at: mongodb::bson::DateTime,
}

fn to_bson_time(t: DateTime<Utc>) -> mongodb::bson::DateTime {
    mongodb::bson::DateTime::from_millis(t.timestamp_millis())
}

fn from_bson_time(t: mongodb::bson::DateTime) -> Result<DateTime<Utc>, AppError> {
    let millis = t.timestamp_millis();
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        tracing::warn!(millis, "stored timestamp out of range");
        AppError::Persistence(format!("stored timestamp {millis}ms is out of range"))
    })
}

impl From<&Event> for EventDocument {
    fn from(e: &Event) -> Self {
        Self {
            id: *e.id.as_object_id(),
            title: e.title.clone(),
            slug: e.slug.clone(),
            description: e.description.clone(),
            overview: e.overview.clone(),
            image: e.image.clone(),
            venue: e.venue.clone(),
            location: e.location.clone(),
            date: e.date.clone(),
            time: e.time.clone(),
            mode: e.mode.clone(),
            audience: e.audience.clone(),
            agenda: e.agenda.clone(),
            organizer: e.organizer.clone(),
            tags: e.tags.clone(),
            created_at: to_bson_time(e.created_at),
            updated_at: to_bson_time(e.updated_at),
        }
    }
}

impl TryFrom<EventDocument> for Event {
    type Error = AppError;

    fn try_from(d: EventDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: d.id.into(),
            title: d.title,
            slug: d.slug,
            description: d.description,
            overview: d.overview,
            image: d.image,
            venue: d.venue,
            location: d.location,
            date: d.date,
            time: d.time,
            mode: d.mode,
            audience: d.audience,
            agenda: d.agenda,
            organizer: d.organizer,
            tags: d.tags,
            created_at: from_bson_time(d.created_at)?,
            updated_at: from_bson_time(d.updated_at)?,
        })
    }
}

impl From<&Booking> for BookingDocument {
    fn from(b: &Booking) -> Self {
        Self {
            id: *b.id.as_object_id(),
            event_id: *b.event_id.as_object_id(),
            email: b.email.clone(),
            created_at: to_bson_time(b.created_at),
            updated_at: to_bson_time(b.updated_at),
        }
    }
}

impl TryFrom<BookingDocument> for Booking {
    type Error = AppError;

    fn try_from(d: BookingDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: d.id.into(),
            event_id: d.event_id.into(),
            email: d.email,
            created_at: from_bson_time(d.created_at)?,
            updated_at: from_bson_time(d.updated_at)?,
        })
    }
}
