//! Domain layer: record types and the pure normalization rules.
//!
//! Nothing in here touches storage. Events are validated and normalized by
//! [`EventDraft::into_event`] / [`Event::patched`]; bookings by
//! [`BookingDraft::into_booking`].

pub mod booking;
pub mod event;
pub mod record_id;
pub mod schedule;
pub mod slug;

pub use booking::{Booking, BookingDraft};
pub use event::{Event, EventDraft, EventPatch};
pub use record_id::RecordId;
pub use schedule::{normalize_date, normalize_time};
pub use slug::generate_slug;
