//! Validated inputs for every action on the surface
//!
//! Each struct is the full contract for one action: `deny_unknown_fields`
//! rejects anything the action does not recognize, and `validate()` checks
//! the value constraints the type system cannot express.

use serde::{Deserialize, Serialize};
use veilmarket_types::{
    Availability, PaymentStatus, Price, ResolutionStatus, Result, SchemaKind, ServiceDetail,
    ServiceStatus, VeilMarketError, MIN_SERVICE_DURATION_MINUTES,
};

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VeilMarketError::invalid_input(field, "must not be empty"));
    }
    Ok(())
}

fn require_rating(field: &str, rating: Option<u8>) -> Result<()> {
    if let Some(r) = rating {
        if !(1..=5).contains(&r) {
            return Err(VeilMarketError::invalid_input(
                field,
                format!("rating {} is outside the 1-5 range", r),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Connection & Schema Provisioning
// ============================================================================

/// One storage node in the cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeInput {
    /// Base URL of the node's API
    pub url: String,
    /// Node identifier (DID)
    pub did: String,
}

/// Organization credentials for the cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsInput {
    /// Organization identifier (DID)
    pub org_did: String,
    /// Organization secret key
    pub secret_key: String,
}

/// Input for `configure_connection`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigureConnectionInput {
    /// Storage nodes, in connection order
    pub nodes: Vec<NodeInput>,
    /// Organization credentials
    pub credentials: CredentialsInput,
}

impl ConfigureConnectionInput {
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(VeilMarketError::invalid_input(
                "nodes",
                "at least one storage node is required",
            ));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            require_non_empty(&format!("nodes[{}].url", i), &node.url)?;
            require_non_empty(&format!("nodes[{}].did", i), &node.did)?;
        }
        require_non_empty("credentials.org_did", &self.credentials.org_did)?;
        require_non_empty("credentials.secret_key", &self.credentials.secret_key)?;
        Ok(())
    }
}

/// Input for `create_remote_schema`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRemoteSchemaInput {
    /// Which record kind to register
    pub kind: SchemaKind,
    /// Collection title; a default is derived from the kind when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl CreateRemoteSchemaInput {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_non_empty("title", title)?;
        }
        Ok(())
    }
}

// ============================================================================
// Listings
// ============================================================================

/// Input for `create_listing`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateListingInput {
    /// Provider display name (confidential)
    pub provider_name: String,
    /// Provider identifier (confidential)
    pub provider_id: String,
    /// Service category
    pub category: String,
    /// Service detail block
    pub service_details: ServiceDetail,
    /// Availability block
    pub availability: Availability,
    /// Price block
    pub price: Price,
    /// Provider contact information (confidential)
    pub contact: String,
}

impl CreateListingInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("provider_name", &self.provider_name)?;
        require_non_empty("provider_id", &self.provider_id)?;
        require_non_empty("category", &self.category)?;
        require_non_empty("contact", &self.contact)?;
        require_non_empty("service_details.title", &self.service_details.title)?;
        if self.service_details.duration_minutes < MIN_SERVICE_DURATION_MINUTES {
            return Err(VeilMarketError::invalid_input(
                "service_details.duration_minutes",
                format!(
                    "duration must be at least {} minutes",
                    MIN_SERVICE_DURATION_MINUTES
                ),
            ));
        }
        require_non_empty("availability.date", &self.availability.date)?;
        require_non_empty("availability.start_time", &self.availability.start_time)?;
        require_non_empty("availability.end_time", &self.availability.end_time)?;
        require_non_empty("availability.timezone", &self.availability.timezone)?;
        require_non_empty("price.currency", &self.price.currency)?;
        if !self.price.amount.is_finite() || self.price.amount <= 0.0 {
            return Err(VeilMarketError::invalid_input(
                "price.amount",
                "amount must be a positive number",
            ));
        }
        Ok(())
    }
}

/// Input for `query_listings`; every filter is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryListingsInput {
    /// Filter by category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Filter by availability date (ISO `YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Upper bound on the price amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl QueryListingsInput {
    pub fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_price {
            if !max.is_finite() || max <= 0.0 {
                return Err(VeilMarketError::invalid_input(
                    "max_price",
                    "max_price must be a positive number",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// Input for `create_booking`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookingInput {
    /// Identifier of the listing being booked
    pub service_id: String,
    /// Customer identifier (confidential)
    pub customer_id: String,
    /// Customer display name (confidential)
    pub customer_name: String,
    /// Meeting link (confidential, optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

impl CreateBookingInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("service_id", &self.service_id)?;
        require_non_empty("customer_id", &self.customer_id)?;
        require_non_empty("customer_name", &self.customer_name)?;
        if let Some(link) = &self.meeting_link {
            require_non_empty("meeting_link", link)?;
        }
        Ok(())
    }
}

/// Input for `update_booking_status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBookingStatusInput {
    /// Booking to transition
    pub booking_id: String,
    /// Target delivery state
    pub service_status: ServiceStatus,
    /// Target payment state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    /// Replacement notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Replacement meeting link (confidential)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

impl UpdateBookingStatusInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("booking_id", &self.booking_id)
    }
}

/// Input for `get_booking_details`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetBookingDetailsInput {
    /// Booking to look up
    pub booking_id: String,
}

impl GetBookingDetailsInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("booking_id", &self.booking_id)
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// Input for `create_feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFeedbackInput {
    /// Booking this feedback is about
    pub booking_id: String,
    /// Provider's rating of the customer (1-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_rating: Option<u8>,
    /// Customer's rating of the provider (1-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_rating: Option<u8>,
    /// Provider's free-text feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_feedback: Option<String>,
    /// Customer's free-text feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_feedback: Option<String>,
    /// Mediating agent's notes (confidential)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_notes: Option<String>,
}

impl CreateFeedbackInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("booking_id", &self.booking_id)?;
        require_rating("provider_rating", self.provider_rating)?;
        require_rating("customer_rating", self.customer_rating)?;
        Ok(())
    }
}

/// Input for `resolve_feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveFeedbackInput {
    /// Feedback record to resolve
    pub feedback_id: String,
    /// Target mediation state
    pub resolution_status: ResolutionStatus,
    /// Mediation notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ResolveFeedbackInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("feedback_id", &self.feedback_id)
    }
}

/// Input for `get_feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetFeedbackInput {
    /// Feedback record to look up
    pub feedback_id: String,
}

impl GetFeedbackInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("feedback_id", &self.feedback_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing_input(duration: u32) -> CreateListingInput {
        CreateListingInput {
            provider_name: "Ada".to_string(),
            provider_id: "provider-1".to_string(),
            category: "consulting".to_string(),
            service_details: ServiceDetail {
                title: "Code review".to_string(),
                description: "One review pass".to_string(),
                duration_minutes: duration,
            },
            availability: Availability {
                date: "2025-07-01".to_string(),
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
                timezone: "Europe/Berlin".to_string(),
            },
            price: Price {
                amount: 50.0,
                currency: "USD".to_string(),
            },
            contact: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_listing_duration_minimum() {
        assert!(listing_input(15).validate().is_ok());

        let err = listing_input(10).validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let raw = json!({
            "service_id": "svc-1",
            "customer_id": "cust-1",
            "customer_name": "Grace",
            "loyalty_points": 12
        });
        assert!(serde_json::from_value::<CreateBookingInput>(raw).is_err());
    }

    #[test]
    fn test_rating_range() {
        let input = CreateFeedbackInput {
            booking_id: "booking-1".to_string(),
            provider_rating: Some(6),
            customer_rating: None,
            provider_feedback: None,
            customer_feedback: None,
            agent_notes: None,
        };
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("1-5"));
    }

    #[test]
    fn test_unknown_status_fails_deserialization() {
        let raw = json!({
            "booking_id": "booking-1",
            "service_status": "teleported"
        });
        assert!(serde_json::from_value::<UpdateBookingStatusInput>(raw).is_err());
    }

    #[test]
    fn test_configure_connection_requires_nodes() {
        let input = ConfigureConnectionInput {
            nodes: vec![],
            credentials: CredentialsInput {
                org_did: "did:org:demo".to_string(),
                secret_key: "sk-demo".to_string(),
            },
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_query_listings_accepts_empty_filter() {
        let input: QueryListingsInput = serde_json::from_value(json!({})).unwrap();
        assert!(input.validate().is_ok());
    }
}
