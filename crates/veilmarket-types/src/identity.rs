//! Identity types for VeilMarket
//!
//! All identity types are strongly typed wrappers around UUIDs to prevent
//! accidental mixing of different ID types. Display renders the bare UUID
//! because the external storage cluster keys records by the plain
//! identifier string.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID types with common implementations
macro_rules! define_id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }
    };
}

// Record identity types
define_id_type!(ListingId, "Unique identifier for a service listing");
define_id_type!(BookingId, "Unique identifier for a booking");
define_id_type!(FeedbackId, "Unique identifier for a feedback record");

// Storage identity types
define_id_type!(
    RemoteSchemaId,
    "Identifier assigned to a structural schema registered with the storage cluster"
);
