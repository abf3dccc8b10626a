//! Event service: insert, update and lookup of events.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Event, EventDraft, EventPatch, RecordId};
use crate::error::{AppError, FieldError};
use crate::persistence::{EventPage, RecordStore};

/// Orchestrates event writes and reads over a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<dyn RecordStore>,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validates, normalizes and inserts a new event.
    ///
    /// # Errors
    ///
    /// Returns a validation or normalization error before anything is
    /// written, [`AppError::DuplicateSlug`] if the derived slug is taken,
    /// or a storage error.
    pub async fn create_event(&self, draft: EventDraft) -> Result<Event, AppError> {
        let event = draft.into_event(Utc::now()).inspect_err(|err| {
            tracing::warn!(error = %err, "event rejected");
        })?;
        self.store.insert_event(&event).await?;
        tracing::info!(event_id = %event.id, slug = %event.slug, "event created");
        Ok(event)
    }

    /// Applies a partial update to the event currently at `slug`.
    ///
    /// Only changed title/date/time fields are re-normalized, so an update
    /// that leaves the title alone keeps the slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EventNotFound`] if no event has that slug, the
    /// same validation errors as [`Self::create_event`], or a storage
    /// error.
    pub async fn update_event(&self, slug: &str, patch: EventPatch) -> Result<Event, AppError> {
        let current = self.get_event_by_slug(slug).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let updated = current.patched(patch, Utc::now()).inspect_err(|err| {
            tracing::warn!(%slug, error = %err, "event update rejected");
        })?;
        self.store.replace_event(&updated).await?;
        tracing::info!(event_id = %updated.id, slug = %updated.slug, "event updated");
        Ok(updated)
    }

    /// Returns the event with the given slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EventNotFound`] if none exists.
    pub async fn get_event_by_slug(&self, slug: &str) -> Result<Event, AppError> {
        self.store
            .find_event_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::EventNotFound(slug.to_string()))
    }

    /// Returns the event with the given hex id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed id and
    /// [`AppError::EventNotFound`] if none exists.
    pub async fn get_event_by_id(&self, id: &str) -> Result<Event, AppError> {
        let record_id: RecordId = id.parse().map_err(|_| {
            AppError::Validation(vec![FieldError::new(
                "id",
                format!("{id:?} is not a valid record id"),
            )])
        })?;
        self.store
            .find_event_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::EventNotFound(id.to_string()))
    }

    /// Returns `limit` events ordered by date and time, starting after the
    /// first `skip`, plus the total event count.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn list_events(&self, skip: u64, limit: u64) -> Result<EventPage, AppError> {
        self.store.list_events(skip, limit).await
    }
}
