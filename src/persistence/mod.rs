//! Persistence layer: the `events` and `bookings` collections.
//!
//! [`RecordStore`] is the seam the services write through. The production
//! implementation is [`MongoStore`], which reaches MongoDB through a
//! single-flight [`ConnectionCache`]; [`MemoryStore`] keeps records in
//! process for tests and database-less local runs.

pub mod connection;
pub mod memory;
pub mod models;
pub mod mongo;

use std::fmt;

use async_trait::async_trait;

pub use connection::{ConnectionCache, Connector, RetryPolicy};
pub use memory::MemoryStore;
pub use mongo::{MongoConnector, MongoStore};

use crate::domain::{Booking, Event, RecordId};
use crate::error::AppError;

/// One window of the ordered event list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPage {
    /// Events in the window, ordered by date, then time.
    pub events: Vec<Event>,
    /// Number of stored events, regardless of the window.
    pub total: u64,
}

/// Storage operations needed by the event and booking services.
///
/// Implementations must reject an event whose slug is already owned by a
/// different event with [`AppError::DuplicateSlug`]. Every method fails
/// with [`AppError::Connectivity`] or [`AppError::Persistence`] when the
/// backend does.
#[async_trait]
pub trait RecordStore: Send + Sync + fmt::Debug {
    /// Inserts a new event.
    ///
    /// # Errors
    ///
    /// [`AppError::DuplicateSlug`] if the slug is taken.
    async fn insert_event(&self, event: &Event) -> Result<(), AppError>;

    /// Replaces the stored event with the same id.
    ///
    /// # Errors
    ///
    /// [`AppError::EventNotFound`] if no such event exists,
    /// [`AppError::DuplicateSlug`] if the new slug belongs to another event.
    async fn replace_event(&self, event: &Event) -> Result<(), AppError>;

    /// Looks up an event by slug.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;

    /// Looks up an event by id.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn find_event_by_id(&self, id: RecordId) -> Result<Option<Event>, AppError>;

    /// Returns up to `limit` events ordered by date, then time, after
    /// skipping the first `skip`, together with the total event count.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn list_events(&self, skip: u64, limit: u64) -> Result<EventPage, AppError>;

    /// Existence-only check; does not fetch the document.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn event_exists(&self, id: RecordId) -> Result<bool, AppError>;

    /// Inserts a new booking. Does not re-check the referenced event.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn insert_booking(&self, booking: &Booking) -> Result<(), AppError>;

    /// Returns the bookings of one event, oldest first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    async fn list_bookings_for_event(&self, event_id: RecordId) -> Result<Vec<Booking>, AppError>;
}
