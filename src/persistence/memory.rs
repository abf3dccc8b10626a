//! In-process record store.
//!
//! [`MemoryStore`] keeps events in a `HashMap` keyed by id and bookings in
//! insertion order, each behind a [`tokio::sync::RwLock`]. It enforces the
//! same slug uniqueness rule as the unique index on `events.slug`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EventPage, RecordStore};
use crate::domain::{Booking, Event, RecordId};
use crate::error::AppError;

/// Volatile [`RecordStore`] used by tests and `STORAGE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<HashMap<RecordId, Event>>,
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes an event, leaving its bookings in place.
    ///
    /// Deleting events is not part of the record API; tests use this to
    /// reproduce an event disappearing between check and insert.
    pub async fn remove_event(&self, id: RecordId) -> Option<Event> {
        self.events.write().await.remove(&id)
    }
}

fn slug_taken(map: &HashMap<RecordId, Event>, event: &Event) -> bool {
    map.values().any(|e| e.slug == event.slug && e.id != event.id)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_event(&self, event: &Event) -> Result<(), AppError> {
        let mut map = self.events.write().await;
        if slug_taken(&map, event) {
            return Err(AppError::DuplicateSlug(event.slug.clone()));
        }
        map.insert(event.id, event.clone());
        Ok(())
    }

    async fn replace_event(&self, event: &Event) -> Result<(), AppError> {
        let mut map = self.events.write().await;
        if !map.contains_key(&event.id) {
            return Err(AppError::EventNotFound(event.id.to_string()));
        }
        if slug_taken(&map, event) {
            return Err(AppError::DuplicateSlug(event.slug.clone()));
        }
        map.insert(event.id, event.clone());
        Ok(())
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let map = self.events.read().await;
        Ok(map.values().find(|e| e.slug == slug).cloned())
    }

    async fn find_event_by_id(&self, id: RecordId) -> Result<Option<Event>, AppError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list_events(&self, skip: u64, limit: u64) -> Result<EventPage, AppError> {
        let map = self.events.read().await;
        let mut ordered: Vec<&Event> = map.values().collect();
        ordered.sort_by(|a, b| (&a.date, &a.time, a.id).cmp(&(&b.date, &b.time, b.id)));
        let window = |n: u64| usize::try_from(n).unwrap_or(usize::MAX);
        Ok(EventPage {
            total: u64::try_from(ordered.len()).unwrap_or(u64::MAX),
            events: ordered
                .into_iter()
                .skip(window(skip))
                .take(window(limit))
                .cloned()
                .collect(),
        })
    }

    async fn event_exists(&self, id: RecordId) -> Result<bool, AppError> {
        Ok(self.events.read().await.contains_key(&id))
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), AppError> {
        self.bookings.write().await.push(booking.clone());
        Ok(())
    }

    async fn list_bookings_for_event(&self, event_id: RecordId) -> Result<Vec<Booking>, AppError> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .iter()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect())
    }
}
