//! Booking types
//!
//! A booking ties a customer agent to a published listing. The referenced
//! service identifier is an informal foreign key: the cluster does not
//! enforce that the listing exists.

use crate::BookingId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting payment
    Pending,
    /// Payment received
    Paid,
    /// Payment returned to the customer
    Refunded,
    /// Under dispute mediation
    Disputed,
}

impl PaymentStatus {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
            Self::Disputed => "disputed",
        }
    }
}

/// Delivery state of the booked service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Booked, not yet started
    Scheduled,
    /// Delivery underway
    InProgress,
    /// Delivered
    Completed,
    /// Called off before delivery
    Cancelled,
    /// Customer did not attend
    NoShow,
}

impl ServiceStatus {
    /// Snake-case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

/// A booking record.
///
/// `customer_id`, `customer_name` and `meeting_link` are confidential; the
/// meeting link is only present (and only wrapped) when one was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Record identifier, the cluster's primary key
    #[serde(rename = "_id")]
    pub id: BookingId,
    /// Identifier of the booked listing (not validated against the cluster)
    pub service_id: String,
    /// Creation timestamp
    pub booked_at: DateTime<Utc>,
    /// Payment state, `pending` at creation
    pub payment_status: PaymentStatus,
    /// Delivery state, `scheduled` at creation
    pub service_status: ServiceStatus,
    /// Free-text notes
    pub notes: String,
    /// Customer identifier (confidential)
    pub customer_id: String,
    /// Customer display name (confidential)
    pub customer_name: String,
    /// Meeting link (confidential, optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}
