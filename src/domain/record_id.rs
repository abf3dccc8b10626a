//! Type-safe record identifier.
//!
//! [`RecordId`] is a newtype wrapper around a BSON [`ObjectId`] so that
//! event and booking identifiers cannot be confused with arbitrary strings.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;

/// Unique identifier of a stored Event or Booking.
///
/// Generated once at insert time and immutable thereafter. Rendered as a
/// 24-character lower-case hex string in JSON and URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Creates a new `RecordId`.
    #[must_use]
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Returns the inner [`ObjectId`].
    #[must_use]
    pub const fn as_object_id(&self) -> &ObjectId {
        &self.0
    }

    /// Returns the hex representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s.trim()).map(Self)
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<RecordId> for ObjectId {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
