//! Data Transfer Objects for REST request/response serialization.
//!
//! JSON keys are camelCase to match the stored documents (`eventId`,
//! `createdAt`). Request fields default to empty so that a missing field
//! is reported by record validation rather than as a JSON syntax error.

pub mod booking_dto;
pub mod common_dto;
pub mod event_dto;

pub use booking_dto::*;
pub use common_dto::*;
pub use event_dto::*;
