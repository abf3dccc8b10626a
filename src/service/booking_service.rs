//! Booking service: links bookings to existing events.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Booking, BookingDraft};
use crate::error::AppError;
use crate::persistence::RecordStore;

/// Orchestrates booking writes over a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct BookingService {
    store: Arc<dyn RecordStore>,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validates the email, checks the referenced event exists and inserts
    /// the booking.
    ///
    /// The existence check and the insert are separate operations with no
    /// transaction around them: an event deleted in between still ends up
    /// with the booking. Nothing in this service deletes events, so the
    /// window only opens for deletions made outside it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidEmail`] or [`AppError::Validation`]
    /// before any query, [`AppError::Reference`] if the event does not
    /// exist, or a storage error.
    pub async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, AppError> {
        let booking = draft.into_booking(Utc::now()).inspect_err(|err| {
            tracing::warn!(error = %err, "booking rejected");
        })?;

        if !self.store.event_exists(booking.event_id).await? {
            tracing::warn!(event_id = %booking.event_id, "booking references missing event");
            return Err(AppError::Reference(booking.event_id.to_string()));
        }

        self.store.insert_booking(&booking).await?;
        tracing::info!(
            booking_id = %booking.id,
            event_id = %booking.event_id,
            "booking created"
        );
        Ok(booking)
    }

    /// Returns the bookings of the event at `slug`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EventNotFound`] if no event has that slug, or a
    /// storage error.
    pub async fn list_bookings_for_event(&self, slug: &str) -> Result<Vec<Booking>, AppError> {
        let event = self
            .store
            .find_event_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::EventNotFound(slug.to_string()))?;
        self.store.list_bookings_for_event(event.id).await
    }
}
