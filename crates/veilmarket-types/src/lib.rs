//! VeilMarket Types - Canonical domain types for the agent services marketplace
//!
//! This crate contains all foundational types for VeilMarket with zero
//! dependencies on other veilmarket crates. It defines the complete type
//! system for:
//!
//! - Identity types (ListingId, BookingId, FeedbackId, RemoteSchemaId)
//! - The three record kinds (service listing, booking, feedback) and their
//!   status enums
//! - The error taxonomy shared by every layer
//!
//! # Confidentiality model
//!
//! Records hold their confidential fields (provider identity, customer
//! identity, meeting links, mediation notes) as plain values. They are
//! rewritten into secret-share wrappers by `veilmarket-vault` immediately
//! before leaving the process; nothing in this crate performs or assumes
//! any cryptography.

pub mod booking;
pub mod error;
pub mod feedback;
pub mod identity;
pub mod listing;

pub use booking::*;
pub use error::*;
pub use feedback::*;
pub use identity::*;
pub use listing::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the VeilMarket types schema
pub const TYPES_VERSION: &str = "0.1.0";

/// The three record kinds stored in the encrypted cluster.
///
/// A closed enum rather than a string discriminator: an unknown kind is a
/// deserialization failure at the boundary, never a silent passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// Service listing published by a provider agent
    Listing,
    /// Booking made by a customer agent
    Booking,
    /// Feedback left after a completed booking
    Feedback,
}

impl SchemaKind {
    /// All kinds, in provisioning order
    pub const ALL: [SchemaKind; 3] = [Self::Listing, Self::Booking, Self::Feedback];

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Booking => "booking",
            Self::Feedback => "feedback",
        }
    }

    /// Parse a wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "listing" => Some(Self::Listing),
            "booking" => Some(Self::Booking),
            "feedback" => Some(Self::Feedback),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
