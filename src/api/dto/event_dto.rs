//! Event DTOs for create, update, get and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Event, EventDraft, EventPatch};

/// Request body for `POST /events`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateEventRequest {
    /// Event title; the slug is derived from it.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Longer overview text.
    pub overview: String,
    /// Image URL or asset path.
    pub image: String,
    /// Venue name.
    pub venue: String,
    /// City / address line.
    pub location: String,
    /// Date, e.g. `2026-02-14` or `2026-02-14T10:00:00Z`.
    pub date: String,
    /// Time, `HH:MM` (24h) or `H:MM am/pm`.
    pub time: String,
    /// Attendance mode.
    pub mode: String,
    /// Intended audience.
    pub audience: String,
    /// Agenda items, in order.
    pub agenda: Vec<String>,
    /// Organizer name.
    pub organizer: String,
    /// Tags, in order.
    pub tags: Vec<String>,
}

impl From<CreateEventRequest> for EventDraft {
    fn from(r: CreateEventRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            overview: r.overview,
            image: r.image,
            venue: r.venue,
            location: r.location,
            date: r.date,
            time: r.time,
            mode: r.mode,
            audience: r.audience,
            agenda: r.agenda,
            organizer: r.organizer,
            tags: r.tags,
        }
    }
}

/// Request body for `PATCH /events/{slug}`. Absent fields are unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
#[allow(missing_docs)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(r: UpdateEventRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            overview: r.overview,
            image: r.image,
            venue: r.venue,
            location: r.location,
            date: r.date,
            time: r.time,
            mode: r.mode,
            audience: r.audience,
            agenda: r.agenda,
            organizer: r.organizer,
            tags: r.tags,
        }
    }
}

/// A stored event as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Hex record id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Unique URL slug.
    pub slug: String,
    /// Short description.
    pub description: String,
    /// Longer overview text.
    pub overview: String,
    /// Image URL or asset path.
    pub image: String,
    /// Venue name.
    pub venue: String,
    /// City / address line.
    pub location: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub time: String,
    /// Attendance mode.
    pub mode: String,
    /// Intended audience.
    pub audience: String,
    /// Agenda items.
    pub agenda: Vec<String>,
    /// Organizer name.
    pub organizer: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id.to_string(),
            title: e.title,
            slug: e.slug,
            description: e.description,
            overview: e.overview,
            image: e.image,
            venue: e.venue,
            location: e.location,
            date: e.date,
            time: e.time,
            mode: e.mode,
            audience: e.audience,
            agenda: e.agenda,
            organizer: e.organizer,
            tags: e.tags,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Paginated list response for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Events on this page, ordered by date and time.
    pub data: Vec<EventResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
