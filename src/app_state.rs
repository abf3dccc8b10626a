//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::StorageBackend;
use crate::persistence::RecordStore;
use crate::service::{BookingService, EventService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event writes and lookups.
    pub event_service: Arc<EventService>,
    /// Booking writes and lookups.
    pub booking_service: Arc<BookingService>,
    /// Backend the services write through, reported by `/health`.
    pub storage: StorageBackend,
}

impl AppState {
    /// Builds both services over one shared store.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, storage: StorageBackend) -> Self {
        Self {
            event_service: Arc::new(EventService::new(Arc::clone(&store))),
            booking_service: Arc::new(BookingService::new(store)),
            storage,
        }
    }
}
