//! Service listing types
//!
//! A listing is published by a provider agent and discovered by customer
//! agents. Its public attributes (category, detail, availability, price)
//! are stored in plaintext; the provider's identity and contact details
//! are secret-shared by the storage cluster.

use crate::ListingId;
use serde::{Deserialize, Serialize};

/// Minimum length of a bookable service slot
pub const MIN_SERVICE_DURATION_MINUTES: u32 = 15;

/// Status of a service listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Open for booking
    Available,
    /// Claimed by a booking
    Booked,
    /// Service delivered
    Completed,
    /// Withdrawn by the provider
    Cancelled,
}

impl ListingStatus {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// What the service is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceDetail {
    /// Short title shown in query results
    pub title: String,
    /// Longer free-text description
    pub description: String,
    /// Slot length in minutes, at least [`MIN_SERVICE_DURATION_MINUTES`]
    pub duration_minutes: u32,
}

/// When the service can be delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Availability {
    /// Calendar date (ISO `YYYY-MM-DD`)
    pub date: String,
    /// Slot start time (`HH:MM`)
    pub start_time: String,
    /// Slot end time (`HH:MM`)
    pub end_time: String,
    /// IANA timezone name
    pub timezone: String,
}

/// What the service costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Price {
    /// Amount in major units
    pub amount: f64,
    /// ISO currency code
    pub currency: String,
}

/// A published service listing.
///
/// `provider_name`, `provider_id` and `contact` are confidential: the
/// record builder wraps them for secret-sharing before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceListing {
    /// Record identifier, the cluster's primary key
    #[serde(rename = "_id")]
    pub id: ListingId,
    /// Service category (free-form, e.g. "consulting")
    pub category: String,
    /// Service detail block
    pub service_details: ServiceDetail,
    /// Availability block
    pub availability: Availability,
    /// Price block
    pub price: Price,
    /// Provider display name (confidential)
    pub provider_name: String,
    /// Provider identifier (confidential)
    pub provider_id: String,
    /// Provider contact information (confidential)
    pub contact: String,
    /// Lifecycle status, `available` at creation
    pub status: ListingStatus,
}
