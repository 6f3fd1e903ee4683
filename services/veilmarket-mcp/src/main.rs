//! VeilMarket MCP Server
//!
//! A Model Context Protocol (MCP) server that lets an agent host drive the
//! VeilMarket action surface. MCP uses JSON-RPC 2.0 over stdio: requests
//! are read from stdin, responses written to stdout, logs go to stderr.
//!
//! ## Available Tools
//!
//! ### Cluster Management
//! - `configure_connection` - Swap the storage node list and credentials
//! - `create_remote_schema` - Register a record schema with the cluster
//! - `generate_identifier` - Mint a fresh unique identifier
//!
//! ### Marketplace Operations
//! - `create_listing` / `query_listings`
//! - `create_booking` / `update_booking_status` / `get_booking_details`
//! - `create_feedback` / `resolve_feedback` / `get_feedback`
//!
//! ## Usage
//!
//! Add to the agent host's MCP configuration:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "veilmarket": {
//!       "command": "veilmarket-mcp"
//!     }
//!   }
//! }
//! ```
//!
//! Cluster credentials and previously provisioned schema identifiers are
//! read from the environment (`VEILMARKET_NODE_1_URL`,
//! `VEILMARKET_ORG_DID`, `VEILMARKET_SCHEMA_ID_LISTING`, ...); a missing
//! configuration is tolerated at startup and surfaces as an
//! initialization failure on the first storage operation, or can be fixed
//! at runtime with `configure_connection`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use veilmarket_actions::{Marketplace, SchemaIds};
use veilmarket_vault::{ClusterConfig, Credentials, VaultGateway};

// ============================================================================
// JSON-RPC Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: serde_json::Value,
    method: String,
    #[serde(default)]
    params: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: serde_json::Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: serde_json::Value,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Tracing to stderr (stdout carries the MCP stream)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("VeilMarket MCP Server starting...");

    let config = ClusterConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(
            "no usable cluster configuration in the environment ({}); \
             waiting for configure_connection",
            e
        );
        ClusterConfig {
            nodes: vec![],
            credentials: Credentials {
                org_did: String::new(),
                secret_key: String::new(),
            },
        }
    });

    let schema_ids = SchemaIds::from_env();
    let gateway = VaultGateway::new(config);
    let market = Arc::new(RwLock::new(Marketplace::new(Box::new(gateway), schema_ids)));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Failed to read line: {}", e);
                continue;
            }
        };

        if line.is_empty() {
            continue;
        }

        tracing::debug!("Received: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = JsonRpcResponse::error(
                    serde_json::Value::Null,
                    -32700,
                    format!("Parse error: {}", e),
                );
                write_response(&mut stdout, &response);
                continue;
            }
        };

        let response = handle_request(&market, request).await;
        write_response(&mut stdout, &response);
    }
}

fn write_response(stdout: &mut io::Stdout, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(s) => {
            tracing::debug!("Sending: {}", s);
            writeln!(stdout, "{}", s).ok();
            stdout.flush().ok();
        }
        Err(e) => tracing::error!("Failed to serialize response: {}", e),
    }
}

async fn handle_request(
    market: &Arc<RwLock<Marketplace>>,
    request: JsonRpcRequest,
) -> JsonRpcResponse {
    match request.method.as_str() {
        "initialize" => handle_initialize(request.id),
        "tools/list" => handle_tools_list(request.id),
        "tools/call" => handle_tools_call(market, request.id, request.params).await,
        "notifications/initialized" => {
            // No response needed for notifications
            JsonRpcResponse::success(request.id, serde_json::json!({}))
        }
        _ => JsonRpcResponse::error(
            request.id,
            -32601,
            format!("Method not found: {}", request.method),
        ),
    }
}

fn handle_initialize(id: serde_json::Value) -> JsonRpcResponse {
    let result = serde_json::json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "serverInfo": {
            "name": "veilmarket",
            "version": env!("CARGO_PKG_VERSION")
        }
    });

    JsonRpcResponse::success(id, result)
}

fn handle_tools_list(id: serde_json::Value) -> JsonRpcResponse {
    let node_schema = serde_json::json!({
        "type": "object",
        "properties": {
            "url": { "type": "string", "description": "Base URL of the node's API" },
            "did": { "type": "string", "description": "Node identifier (DID)" }
        },
        "required": ["url", "did"]
    });

    let tools = vec![
        Tool {
            name: "configure_connection".to_string(),
            description: "Configure the encrypted-storage cluster: node list and organization credentials. Forces the connection to be re-established on the next operation.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "nodes": {
                        "type": "array",
                        "items": node_schema,
                        "description": "Storage nodes, in connection order"
                    },
                    "credentials": {
                        "type": "object",
                        "properties": {
                            "org_did": { "type": "string" },
                            "secret_key": { "type": "string" }
                        },
                        "required": ["org_did", "secret_key"]
                    }
                },
                "required": ["nodes", "credentials"]
            }),
        },
        Tool {
            name: "create_remote_schema".to_string(),
            description: "Register the structural schema for a record kind (listing, booking or feedback) with the cluster. Returns the assigned schema identifier.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "kind": {
                        "type": "string",
                        "enum": ["listing", "booking", "feedback"],
                        "description": "Which record kind to register"
                    },
                    "title": {
                        "type": "string",
                        "description": "Optional collection title"
                    }
                },
                "required": ["kind"]
            }),
        },
        Tool {
            name: "create_listing".to_string(),
            description: "Publish a service listing. Provider name, provider id and contact details are stored as secret-shares, never plaintext.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "provider_name": { "type": "string", "description": "Provider display name (confidential)" },
                    "provider_id": { "type": "string", "description": "Provider identifier (confidential)" },
                    "category": { "type": "string", "description": "Service category, e.g. 'consulting'" },
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
                            "date": { "type": "string", "description": "ISO date, e.g. 2025-07-01" },
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
                    "contact": { "type": "string", "description": "Provider contact information (confidential)" }
                },
                "required": ["provider_name", "provider_id", "category", "service_details", "availability", "price", "contact"]
            }),
        },
        Tool {
            name: "query_listings".to_string(),
            description: "Search published listings. Results are always restricted to 'available' status; category, date and max_price filters are optional.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "category": { "type": "string" },
                    "date": { "type": "string", "description": "ISO date filter" },
                    "max_price": { "type": "number", "description": "Upper bound on the price amount" }
                }
            }),
        },
        Tool {
            name: "create_booking".to_string(),
            description: "Book a listed service. Customer id, customer name and the optional meeting link are stored as secret-shares.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "service_id": { "type": "string", "description": "Identifier of the listing being booked" },
                    "customer_id": { "type": "string", "description": "Customer identifier (confidential)" },
                    "customer_name": { "type": "string", "description": "Customer display name (confidential)" },
                    "meeting_link": { "type": "string", "description": "Optional meeting link (confidential)" }
                },
                "required": ["service_id", "customer_id", "customer_name"]
            }),
        },
        Tool {
            name: "update_booking_status".to_string(),
            description: "Acknowledge a booking status transition. The reply echoes the requested state; the stored record is not rewritten.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "booking_id": { "type": "string" },
                    "service_status": {
                        "type": "string",
                        "enum": ["scheduled", "in_progress", "completed", "cancelled", "no_show"]
                    },
                    "payment_status": {
                        "type": "string",
                        "enum": ["pending", "paid", "refunded", "disputed"]
                    },
                    "notes": { "type": "string" },
                    "meeting_link": { "type": "string" }
                },
                "required": ["booking_id", "service_status"]
            }),
        },
        Tool {
            name: "get_booking_details".to_string(),
            description: "Fetch booking details. Returns a representative example payload rather than the stored record.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "booking_id": { "type": "string" }
                },
                "required": ["booking_id"]
            }),
        },
        Tool {
            name: "create_feedback".to_string(),
            description: "File feedback for a booking. Ratings are 1-5; the mediating agent's notes are stored as secret-shares.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "booking_id": { "type": "string" },
                    "provider_rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                    "customer_rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                    "provider_feedback": { "type": "string" },
                    "customer_feedback": { "type": "string" },
                    "agent_notes": { "type": "string", "description": "Mediation notes (confidential)" }
                },
                "required": ["booking_id"]
            }),
        },
        Tool {
            name: "resolve_feedback".to_string(),
            description: "Acknowledge a feedback resolution. The reply echoes the requested resolution; the stored record is not rewritten.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "feedback_id": { "type": "string" },
                    "resolution_status": {
                        "type": "string",
                        "enum": ["pending", "resolved", "disputed", "refunded"]
                    },
                    "notes": { "type": "string" }
                },
                "required": ["feedback_id", "resolution_status"]
            }),
        },
        Tool {
            name: "get_feedback".to_string(),
            description: "Fetch a feedback record. Returns a representative example payload rather than the stored record.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "feedback_id": { "type": "string" }
                },
                "required": ["feedback_id"]
            }),
        },
        Tool {
            name: "generate_identifier".to_string(),
            description: "Mint a fresh unique identifier.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
    ];

    JsonRpcResponse::success(id, serde_json::json!({ "tools": tools }))
}

async fn handle_tools_call(
    market: &Arc<RwLock<Marketplace>>,
    id: serde_json::Value,
    params: serde_json::Value,
) -> JsonRpcResponse {
    let tool_name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    let text = match tool_name {
        "configure_connection" => market.read().await.configure_connection(arguments).await,
        "create_remote_schema" => market.write().await.create_remote_schema(arguments).await,
        "create_listing" => market.read().await.create_listing(arguments).await,
        "query_listings" => market.read().await.query_listings(arguments).await,
        "create_booking" => market.read().await.create_booking(arguments).await,
        "update_booking_status" => market.read().await.update_booking_status(arguments).await,
        "get_booking_details" => market.read().await.get_booking_details(arguments).await,
        "create_feedback" => market.read().await.create_feedback(arguments).await,
        "resolve_feedback" => market.read().await.resolve_feedback(arguments).await,
        "get_feedback" => market.read().await.get_feedback(arguments).await,
        "generate_identifier" => market.read().await.generate_identifier(),
        _ => {
            return JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", tool_name));
        }
    };

    let is_error = text.starts_with("Error:");
    let mut result = serde_json::json!({
        "content": [{"type": "text", "text": text}]
    });
    if is_error {
        result["isError"] = serde_json::json!(true);
    }

    JsonRpcResponse::success(id, result)
}
