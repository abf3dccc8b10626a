//! Service layer: the validate → normalize → persist pipelines.
//!
//! [`EventService`] and [`BookingService`] are what the HTTP handlers call.
//! Each write runs its checks to completion before touching the
//! [`crate::persistence::RecordStore`]; a rejected write stores nothing.

pub mod booking_service;
pub mod event_service;

pub use booking_service::BookingService;
pub use event_service::EventService;
