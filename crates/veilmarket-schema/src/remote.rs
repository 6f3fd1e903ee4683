//! Remote schema documents
//!
//! The storage cluster validates every submitted record against a
//! previously registered JSON-Schema document. These builders produce the
//! document for each record kind. Confidential fields are declared in
//! their stored form: a one-key `{"%share": ...}` object, since the
//! cluster secret-shares the value instead of keeping plaintext.

use serde_json::{json, Value};
use veilmarket_types::SchemaKind;

/// Stored form of a secret-shared field
fn share_field() -> Value {
    json!({
        "type": "object",
        "properties": {
            "%share": { "type": "string" }
        },
        "required": ["%share"]
    })
}

/// Default collection title for a record kind
pub fn default_title(kind: SchemaKind) -> String {
    match kind {
        SchemaKind::Listing => "Service Listings".to_string(),
        SchemaKind::Booking => "Bookings".to_string(),
        SchemaKind::Feedback => "Feedback".to_string(),
    }
}

/// The JSON-Schema document registered with the cluster for `kind`
pub fn schema_document(kind: SchemaKind) -> Value {
    match kind {
        SchemaKind::Listing => listing_document(),
        SchemaKind::Booking => booking_document(),
        SchemaKind::Feedback => feedback_document(),
    }
}

fn listing_document() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "_id": { "type": "string", "format": "uuid" },
                "category": { "type": "string" },
                "service_details": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "duration_minutes": { "type": "integer", "minimum": 15 }
                    },
                    "required": ["title", "description", "duration_minutes"]
                },
                "availability": {
                    "type": "object",
                    "properties": {
                        "date": { "type": "string" },
                        "start_time": { "type": "string" },
                        "end_time": { "type": "string" },
                        "timezone": { "type": "string" }
                    },
                    "required": ["date", "start_time", "end_time", "timezone"]
                },
                "price": {
                    "type": "object",
                    "properties": {
                        "amount": { "type": "number" },
                        "currency": { "type": "string" }
                    },
                    "required": ["amount", "currency"]
                },
                "provider_name": share_field(),
                "provider_id": share_field(),
                "contact": share_field(),
                "status": {
                    "type": "string",
                    "enum": ["available", "booked", "completed", "cancelled"]
                }
            },
            "required": [
                "_id", "category", "service_details", "availability", "price",
                "provider_name", "provider_id", "contact", "status"
            ]
        }
    })
}

fn booking_document() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "_id": { "type": "string", "format": "uuid" },
                "service_id": { "type": "string" },
                "booked_at": { "type": "string", "format": "date-time" },
                "payment_status": {
                    "type": "string",
                    "enum": ["pending", "paid", "refunded", "disputed"]
                },
                "service_status": {
                    "type": "string",
                    "enum": ["scheduled", "in_progress", "completed", "cancelled", "no_show"]
                },
                "notes": { "type": "string" },
                "customer_id": share_field(),
                "customer_name": share_field(),
                "meeting_link": share_field()
            },
            "required": [
                "_id", "service_id", "booked_at", "payment_status",
                "service_status", "notes", "customer_id", "customer_name"
            ]
        }
    })
}

fn feedback_document() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "_id": { "type": "string", "format": "uuid" },
                "booking_id": { "type": "string" },
                "provider_rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                "customer_rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                "provider_feedback": { "type": "string" },
                "customer_feedback": { "type": "string" },
                "resolution_status": {
                    "type": "string",
                    "enum": ["pending", "resolved", "disputed", "refunded"]
                },
                "agent_notes": share_field()
            },
            "required": ["_id", "booking_id", "resolution_status"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_document() {
        for kind in SchemaKind::ALL {
            let doc = schema_document(kind);
            assert_eq!(doc["type"], "array");
            assert!(doc["items"]["properties"]["_id"].is_object());
        }
    }

    #[test]
    fn test_listing_confidential_fields_are_share_form() {
        let doc = schema_document(SchemaKind::Listing);
        for field in ["provider_name", "provider_id", "contact"] {
            let spec = &doc["items"]["properties"][field];
            assert_eq!(spec["required"][0], "%share", "field {}", field);
        }
    }

    #[test]
    fn test_optional_confidential_fields_not_required() {
        let doc = schema_document(SchemaKind::Booking);
        let required: Vec<&str> = doc["items"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(!required.contains(&"meeting_link"));

        let doc = schema_document(SchemaKind::Feedback);
        let required: Vec<&str> = doc["items"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(!required.contains(&"agent_notes"));
    }

    #[test]
    fn test_default_titles() {
        assert_eq!(default_title(SchemaKind::Listing), "Service Listings");
    }
}
