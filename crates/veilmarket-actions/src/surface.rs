//! The marketplace action surface

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;
use veilmarket_records::{build_booking, build_feedback, build_listing};
use veilmarket_schema::{
    default_title, schema_document, ConfigureConnectionInput, CreateBookingInput,
    CreateFeedbackInput, CreateListingInput, CreateRemoteSchemaInput, GetBookingDetailsInput,
    GetFeedbackInput, QueryListingsInput, ResolveFeedbackInput, UpdateBookingStatusInput,
};
use veilmarket_types::{RemoteSchemaId, Result, SchemaKind, VeilMarketError};
use veilmarket_vault::{ClusterConfig, Credentials, NodeConfig, VaultStore};

/// The provisioned remote schema identifiers, one slot per record kind.
///
/// Slots stay empty until `create_remote_schema` runs (or the identifiers
/// are supplied up front, e.g. from the environment); every record
/// operation checks its slot before touching the cluster.
#[derive(Debug, Clone, Default)]
pub struct SchemaIds {
    /// Listing collection schema
    pub listing: Option<RemoteSchemaId>,
    /// Booking collection schema
    pub booking: Option<RemoteSchemaId>,
    /// Feedback collection schema
    pub feedback: Option<RemoteSchemaId>,
}

impl SchemaIds {
    /// Read previously provisioned identifiers from the environment
    /// (`VEILMARKET_SCHEMA_ID_LISTING` and friends); unset or unparsable
    /// values leave the slot empty.
    pub fn from_env() -> Self {
        let read = |name: &str| -> Option<RemoteSchemaId> {
            let raw = std::env::var(name).ok()?;
            if raw.trim().is_empty() {
                return None;
            }
            match RemoteSchemaId::parse(raw.trim()) {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(var = name, "ignoring unparsable schema identifier");
                    None
                }
            }
        };

        Self {
            listing: read("VEILMARKET_SCHEMA_ID_LISTING"),
            booking: read("VEILMARKET_SCHEMA_ID_BOOKING"),
            feedback: read("VEILMARKET_SCHEMA_ID_FEEDBACK"),
        }
    }

    /// The identifier for `kind`, if provisioned
    pub fn get(&self, kind: SchemaKind) -> Option<&RemoteSchemaId> {
        match kind {
            SchemaKind::Listing => self.listing.as_ref(),
            SchemaKind::Booking => self.booking.as_ref(),
            SchemaKind::Feedback => self.feedback.as_ref(),
        }
    }

    fn set(&mut self, kind: SchemaKind, id: RemoteSchemaId) {
        match kind {
            SchemaKind::Listing => self.listing = Some(id),
            SchemaKind::Booking => self.booking = Some(id),
            SchemaKind::Feedback => self.feedback = Some(id),
        }
    }
}

/// The action surface: one method per externally invokable operation.
///
/// Owns everything an action needs - the storage capability, the
/// provisioned schema identifiers - so hosts can run several independent
/// instances side by side.
pub struct Marketplace {
    store: Box<dyn VaultStore>,
    schema_ids: SchemaIds,
}

fn parse_input<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| VeilMarketError::invalid_input("request", e.to_string()))
}

fn render(result: Result<String>) -> String {
    match result {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(code = e.error_code(), "action failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

impl Marketplace {
    /// Create a surface over `store` with the given provisioned schemas
    pub fn new(store: Box<dyn VaultStore>, schema_ids: SchemaIds) -> Self {
        Self { store, schema_ids }
    }

    fn require_schema(&self, kind: SchemaKind) -> Result<RemoteSchemaId> {
        self.schema_ids
            .get(kind)
            .cloned()
            .ok_or(VeilMarketError::MissingSchema { kind })
    }

    // ========================================================================
    // Connection & Provisioning
    // ========================================================================

    /// Swap the node list and credentials; the cluster connection is
    /// re-established with the new parameters on the next operation
    pub async fn configure_connection(&self, args: Value) -> String {
        render(self.try_configure_connection(args).await)
    }

    async fn try_configure_connection(&self, args: Value) -> Result<String> {
        let input: ConfigureConnectionInput = parse_input(args)?;
        input.validate()?;

        let node_count = input.nodes.len();
        let config = ClusterConfig {
            nodes: input
                .nodes
                .into_iter()
                .map(|n| NodeConfig {
                    url: n.url,
                    did: n.did,
                })
                .collect(),
            credentials: Credentials {
                org_did: input.credentials.org_did,
                secret_key: input.credentials.secret_key,
            },
        };

        self.store.reconfigure(config).await?;
        Ok(format!(
            "✓ Connection configured with {} storage node(s); the cluster link will be re-established on next use",
            node_count
        ))
    }

    /// Register the structural schema for a record kind with the cluster
    /// and remember the assigned identifier
    pub async fn create_remote_schema(&mut self, args: Value) -> String {
        render(self.try_create_remote_schema(args).await)
    }

    async fn try_create_remote_schema(&mut self, args: Value) -> Result<String> {
        let input: CreateRemoteSchemaInput = parse_input(args)?;
        input.validate()?;

        let title = input
            .title
            .unwrap_or_else(|| default_title(input.kind));
        let document = schema_document(input.kind);
        let id = self
            .store
            .create_schema(input.kind, &title, document)
            .await?;

        self.schema_ids.set(input.kind, id.clone());
        Ok(format!(
            "✓ Registered {} schema '{}'\n  Schema ID: {}",
            input.kind, title, id
        ))
    }

    /// Return a freshly generated unique identifier
    pub fn generate_identifier(&self) -> String {
        format!("Generated identifier: {}", Uuid::new_v4())
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Publish a service listing; provider identity and contact details are
    /// stored as secret-shares
    pub async fn create_listing(&self, args: Value) -> String {
        render(self.try_create_listing(args).await)
    }

    async fn try_create_listing(&self, args: Value) -> Result<String> {
        let input: CreateListingInput = parse_input(args)?;
        input.validate()?;

        let schema = self.require_schema(SchemaKind::Listing)?;
        let title = input.service_details.title.clone();
        let (id, record) = build_listing(input)?;
        self.store.submit_batch(&schema, vec![record]).await?;

        tracing::info!(listing_id = %id, "listing published");
        Ok(format!(
            "✓ Service listing created\n  ID: {}\n  Title: {}\n  Status: available",
            id, title
        ))
    }

    /// Query published listings; results are always restricted to
    /// `available` status
    pub async fn query_listings(&self, args: Value) -> String {
        render(self.try_query_listings(args).await)
    }

    async fn try_query_listings(&self, args: Value) -> Result<String> {
        let input: QueryListingsInput = parse_input(args)?;
        input.validate()?;

        let schema = self.require_schema(SchemaKind::Listing)?;

        let mut filter = serde_json::Map::new();
        filter.insert("status".to_string(), json!("available"));
        if let Some(category) = input.category {
            filter.insert("category".to_string(), json!(category));
        }
        if let Some(date) = input.date {
            filter.insert("availability.date".to_string(), json!(date));
        }
        if let Some(max_price) = input.max_price {
            filter.insert("price.amount".to_string(), json!({ "$lte": max_price }));
        }

        let records = self.store.query(&schema, Value::Object(filter)).await?;
        if records.is_empty() {
            return Ok("No available listings matched the filter".to_string());
        }

        let mut output = format!("Found {} available listing(s):\n", records.len());
        for record in &records {
            let id = record
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or("(no id)");
            let title = record
                .pointer("/service_details/title")
                .and_then(Value::as_str)
                .unwrap_or("(untitled)");
            let category = record
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or("-");
            let amount = record
                .pointer("/price/amount")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let currency = record
                .pointer("/price/currency")
                .and_then(Value::as_str)
                .unwrap_or("");
            let date = record
                .pointer("/availability/date")
                .and_then(Value::as_str)
                .unwrap_or("-");
            output.push_str(&format!(
                "  • {} — {} | {} | {:.2} {} | {}\n",
                id, title, category, amount, currency, date
            ));
        }
        Ok(output.trim_end().to_string())
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Book a listed service; customer identity (and the meeting link, when
    /// supplied) are stored as secret-shares
    pub async fn create_booking(&self, args: Value) -> String {
        render(self.try_create_booking(args).await)
    }

    async fn try_create_booking(&self, args: Value) -> Result<String> {
        let input: CreateBookingInput = parse_input(args)?;
        input.validate()?;

        let schema = self.require_schema(SchemaKind::Booking)?;
        let service_id = input.service_id.clone();
        let (id, record) = build_booking(input)?;
        self.store.submit_batch(&schema, vec![record]).await?;

        tracing::info!(booking_id = %id, service_id = %service_id, "booking created");
        Ok(format!(
            "✓ Booking created\n  ID: {}\n  Service: {}\n  Service status: scheduled\n  Payment status: pending",
            id, service_id
        ))
    }

    /// Acknowledge a booking status transition.
    ///
    /// The reply echoes the requested target state; the stored booking
    /// record is not rewritten.
    pub async fn update_booking_status(&self, args: Value) -> String {
        render(self.try_update_booking_status(args).await)
    }

    async fn try_update_booking_status(&self, args: Value) -> Result<String> {
        let input: UpdateBookingStatusInput = parse_input(args)?;
        input.validate()?;

        // The schema must exist even though no write happens here.
        self.require_schema(SchemaKind::Booking)?;

        let mut output = format!(
            "✓ Booking {} updated\n  Service status: {}",
            input.booking_id,
            input.service_status.as_str()
        );
        if let Some(payment) = input.payment_status {
            output.push_str(&format!("\n  Payment status: {}", payment.as_str()));
        }
        if let Some(notes) = &input.notes {
            output.push_str(&format!("\n  Notes: {}", notes));
        }
        if input.meeting_link.is_some() {
            output.push_str("\n  Meeting link: updated (stored as secret-shares)");
        }
        Ok(output)
    }

    /// Return a representative booking detail payload.
    ///
    /// The payload is a fixed example and does not reflect the stored
    /// record for the requested identifier.
    pub async fn get_booking_details(&self, args: Value) -> String {
        render(self.try_get_booking_details(args).await)
    }

    async fn try_get_booking_details(&self, args: Value) -> Result<String> {
        let input: GetBookingDetailsInput = parse_input(args)?;
        input.validate()?;

        self.require_schema(SchemaKind::Booking)?;

        Ok("Booking details:\n  \
            ID: 00000000-0000-4000-8000-000000000001\n  \
            Service: Example consultation\n  \
            Service status: scheduled\n  \
            Payment status: pending\n  \
            Notes: Example booking record"
            .to_string())
    }

    // ========================================================================
    // Feedback
    // ========================================================================

    /// File feedback for a booking; the resolution starts `pending` and
    /// the mediating agent's notes, when supplied, are stored as
    /// secret-shares
    pub async fn create_feedback(&self, args: Value) -> String {
        render(self.try_create_feedback(args).await)
    }

    async fn try_create_feedback(&self, args: Value) -> Result<String> {
        let input: CreateFeedbackInput = parse_input(args)?;
        input.validate()?;

        let schema = self.require_schema(SchemaKind::Feedback)?;
        let booking_id = input.booking_id.clone();
        let (id, record) = build_feedback(input)?;
        self.store.submit_batch(&schema, vec![record]).await?;

        tracing::info!(feedback_id = %id, booking_id = %booking_id, "feedback filed");
        Ok(format!(
            "✓ Feedback created\n  ID: {}\n  Booking: {}\n  Resolution status: pending",
            id, booking_id
        ))
    }

    /// Acknowledge a feedback resolution.
    ///
    /// The reply echoes the requested resolution; the stored feedback
    /// record is not rewritten.
    pub async fn resolve_feedback(&self, args: Value) -> String {
        render(self.try_resolve_feedback(args).await)
    }

    async fn try_resolve_feedback(&self, args: Value) -> Result<String> {
        let input: ResolveFeedbackInput = parse_input(args)?;
        input.validate()?;

        self.require_schema(SchemaKind::Feedback)?;

        let mut output = format!(
            "✓ Feedback {} marked '{}'",
            input.feedback_id,
            input.resolution_status.as_str()
        );
        if let Some(notes) = &input.notes {
            output.push_str(&format!("\n  Notes: {}", notes));
        }
        Ok(output)
    }

    /// Return a representative feedback payload.
    ///
    /// The payload is a fixed example and does not reflect the stored
    /// record for the requested identifier.
    pub async fn get_feedback(&self, args: Value) -> String {
        render(self.try_get_feedback(args).await)
    }

    async fn try_get_feedback(&self, args: Value) -> Result<String> {
        let input: GetFeedbackInput = parse_input(args)?;
        input.validate()?;

        self.require_schema(SchemaKind::Feedback)?;

        Ok("Feedback details:\n  \
            ID: 00000000-0000-4000-8000-000000000002\n  \
            Customer rating: 5\n  \
            Customer feedback: Great session, would book again\n  \
            Resolution status: pending"
            .to_string())
    }
}
