//! Record builders
//!
//! Each builder returns the minted identifier alongside the marked record
//! so callers can report the identifier without digging it back out of the
//! JSON. Optional confidential fields (`meeting_link`, `agent_notes`) are
//! omitted from the serialized record when absent, so the marker never
//! sees them; when present they are wrapped like every other confidential
//! field.

use chrono::Utc;
use serde_json::Value;
use veilmarket_schema::{CreateBookingInput, CreateFeedbackInput, CreateListingInput};
use veilmarket_types::{
    Booking, BookingId, Feedback, FeedbackId, ListingId, ListingStatus, PaymentStatus, Result,
    ResolutionStatus, ServiceListing, ServiceStatus, VeilMarketError,
};
use veilmarket_vault::mark_secret_fields;

/// Confidential fields of a service listing
pub const LISTING_SECRET_FIELDS: &[&str] = &["provider_name", "provider_id", "contact"];

/// Confidential fields of a booking; `meeting_link` is only present when
/// one was supplied
pub const BOOKING_SECRET_FIELDS: &[&str] = &["customer_id", "customer_name", "meeting_link"];

/// Confidential fields of a feedback record; `agent_notes` is only present
/// when the mediating agent supplied notes
pub const FEEDBACK_SECRET_FIELDS: &[&str] = &["agent_notes"];

fn to_record<T: serde::Serialize>(record: &T) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| VeilMarketError::internal(e.to_string()))
}

/// Assemble a listing record: fresh identifier, `available` status,
/// provider identity and contact marked for secret-sharing
pub fn build_listing(input: CreateListingInput) -> Result<(ListingId, Value)> {
    let id = ListingId::new();
    let listing = ServiceListing {
        id: id.clone(),
        category: input.category,
        service_details: input.service_details,
        availability: input.availability,
        price: input.price,
        provider_name: input.provider_name,
        provider_id: input.provider_id,
        contact: input.contact,
        status: ListingStatus::Available,
    };

    let record = mark_secret_fields(&to_record(&listing)?, LISTING_SECRET_FIELDS);
    Ok((id, record))
}

/// Assemble a booking record: fresh identifier, `scheduled`/`pending`
/// statuses, creation timestamp, customer identity (and meeting link when
/// present) marked for secret-sharing
pub fn build_booking(input: CreateBookingInput) -> Result<(BookingId, Value)> {
    let id = BookingId::new();
    let booking = Booking {
        id: id.clone(),
        service_id: input.service_id,
        booked_at: Utc::now(),
        payment_status: PaymentStatus::Pending,
        service_status: ServiceStatus::Scheduled,
        notes: String::new(),
        customer_id: input.customer_id,
        customer_name: input.customer_name,
        meeting_link: input.meeting_link,
    };

    let record = mark_secret_fields(&to_record(&booking)?, BOOKING_SECRET_FIELDS);
    Ok((id, record))
}

/// Assemble a feedback record: fresh identifier, resolution forced to
/// `pending`, agent notes marked for secret-sharing when present
pub fn build_feedback(input: CreateFeedbackInput) -> Result<(FeedbackId, Value)> {
    let id = FeedbackId::new();
    let feedback = Feedback {
        id: id.clone(),
        booking_id: input.booking_id,
        provider_rating: input.provider_rating,
        customer_rating: input.customer_rating,
        provider_feedback: input.provider_feedback,
        customer_feedback: input.customer_feedback,
        resolution_status: ResolutionStatus::Pending,
        agent_notes: input.agent_notes,
    };

    let record = mark_secret_fields(&to_record(&feedback)?, FEEDBACK_SECRET_FIELDS);
    Ok((id, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use veilmarket_types::{Availability, Price, ServiceDetail};

    fn listing_input() -> CreateListingInput {
        CreateListingInput {
            provider_name: "Ada".to_string(),
            provider_id: "provider-1".to_string(),
            category: "consulting".to_string(),
            service_details: ServiceDetail {
                title: "Code review".to_string(),
                description: "One review pass".to_string(),
                duration_minutes: 30,
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
    fn test_listing_builder_defaults_and_marking() {
        let (id, record) = build_listing(listing_input()).unwrap();

        assert!(!id.to_string().is_empty());
        assert_eq!(record["_id"], json!(id.to_string()));
        assert_eq!(record["status"], json!("available"));

        // Confidential fields are wrapped, public fields are not
        assert_eq!(record["provider_name"], json!({ "%share": "Ada" }));
        assert_eq!(record["provider_id"], json!({ "%share": "provider-1" }));
        assert_eq!(record["contact"], json!({ "%share": "ada@example.com" }));
        assert_eq!(record["category"], json!("consulting"));
        assert_eq!(record["service_details"]["title"], json!("Code review"));
    }

    #[test]
    fn test_booking_builder_defaults() {
        let input = CreateBookingInput {
            service_id: "svc-1".to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: "Grace".to_string(),
            meeting_link: None,
        };

        let (id, record) = build_booking(input).unwrap();

        assert_eq!(record["_id"], json!(id.to_string()));
        assert_eq!(record["service_status"], json!("scheduled"));
        assert_eq!(record["payment_status"], json!("pending"));
        assert_eq!(record["customer_id"], json!({ "%share": "cust-1" }));
        assert_eq!(record["customer_name"], json!({ "%share": "Grace" }));
        assert!(record["booked_at"].is_string());
    }

    #[test]
    fn test_booking_meeting_link_marked_only_when_present() {
        let without = CreateBookingInput {
            service_id: "svc-1".to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: "Grace".to_string(),
            meeting_link: None,
        };
        let (_, record) = build_booking(without).unwrap();
        assert!(record.get("meeting_link").is_none());

        let with = CreateBookingInput {
            service_id: "svc-1".to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: "Grace".to_string(),
            meeting_link: Some("https://x".to_string()),
        };
        let (_, record) = build_booking(with).unwrap();
        assert_eq!(record["meeting_link"], json!({ "%share": "https://x" }));
    }

    #[test]
    fn test_feedback_builder_forces_pending_and_marks_notes() {
        let input = CreateFeedbackInput {
            booking_id: "booking-1".to_string(),
            provider_rating: Some(4),
            customer_rating: Some(5),
            provider_feedback: None,
            customer_feedback: Some("on time".to_string()),
            agent_notes: Some("mediated amicably".to_string()),
        };

        let (id, record) = build_feedback(input).unwrap();

        assert_eq!(record["_id"], json!(id.to_string()));
        assert_eq!(record["resolution_status"], json!("pending"));
        assert_eq!(record["agent_notes"], json!({ "%share": "mediated amicably" }));
        assert_eq!(record["customer_rating"], json!(5));
        assert!(record.get("provider_feedback").is_none());
    }

    #[test]
    fn test_feedback_without_notes_has_no_notes_field() {
        let input = CreateFeedbackInput {
            booking_id: "booking-1".to_string(),
            provider_rating: None,
            customer_rating: None,
            provider_feedback: None,
            customer_feedback: None,
            agent_notes: None,
        };

        let (_, record) = build_feedback(input).unwrap();
        assert!(record.get("agent_notes").is_none());
    }

    #[test]
    fn test_builders_mint_distinct_identifiers() {
        let (a, _) = build_listing(listing_input()).unwrap();
        let (b, _) = build_listing(listing_input()).unwrap();
        assert_ne!(a, b);
    }
}
