//! Feedback types
//!
//! Two-sided feedback collected after a booking, plus the mediation state
//! used when the parties disagree. Mediation notes written by the agent
//! are confidential.

use crate::FeedbackId;
use serde::{Deserialize, Serialize};

/// Mediation state of a feedback record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Open, no decision yet
    Pending,
    /// Closed without compensation
    Resolved,
    /// Escalated to a dispute
    Disputed,
    /// Closed with a refund
    Refunded,
}

impl ResolutionStatus {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Disputed => "disputed",
            Self::Refunded => "refunded",
        }
    }
}

/// A feedback record.
///
/// Ratings are 1-5 when present. `agent_notes` is confidential and only
/// present (and only wrapped) when the mediating agent supplied notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Record identifier, the cluster's primary key
    #[serde(rename = "_id")]
    pub id: FeedbackId,
    /// Identifier of the booking this feedback is about (not validated)
    pub booking_id: String,
    /// Provider's rating of the customer (1-5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_rating: Option<u8>,
    /// Customer's rating of the provider (1-5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_rating: Option<u8>,
    /// Provider's free-text feedback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_feedback: Option<String>,
    /// Customer's free-text feedback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_feedback: Option<String>,
    /// Mediation state, forced to `pending` at creation
    pub resolution_status: ResolutionStatus,
    /// Mediating agent's notes (confidential, optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_notes: Option<String>,
}
