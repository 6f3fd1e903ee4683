//! The vault gateway
//!
//! HTTP adapter over the cluster's record API. The connection handle is
//! established lazily on first use and torn down by reconfiguration; a
//! failed establishment leaves the gateway uninitialized and the next
//! operation tries again. There is no retry, timeout, or partial-failure
//! handling here beyond what the client library does on its own.
//!
//! Writes broadcast the same prepared batch to every configured node (the
//! cluster performs the secret-sharing and owns reconciliation) and every
//! node must accept; reads are answered by the first node.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use veilmarket_types::{RemoteSchemaId, Result, SchemaKind, VeilMarketError};

use crate::{ClusterConfig, VaultStore};

enum Connection {
    Uninitialized,
    Ready(reqwest::Client),
}

struct GatewayState {
    config: ClusterConfig,
    conn: Connection,
}

/// HTTP gateway to the encrypted-storage cluster
pub struct VaultGateway {
    state: RwLock<GatewayState>,
}

impl VaultGateway {
    /// Create an unconnected gateway; the connection is established on
    /// first use
    pub fn new(config: ClusterConfig) -> Self {
        Self {
            state: RwLock::new(GatewayState {
                config,
                conn: Connection::Uninitialized,
            }),
        }
    }

    /// Get the connection handle, establishing it if necessary
    async fn ensure_ready(&self) -> Result<(reqwest::Client, ClusterConfig)> {
        {
            let state = self.state.read().await;
            if let Connection::Ready(client) = &state.conn {
                return Ok((client.clone(), state.config.clone()));
            }
        }

        let mut state = self.state.write().await;
        // Another task may have connected while we waited for the lock
        if let Connection::Ready(client) = &state.conn {
            return Ok((client.clone(), state.config.clone()));
        }

        state
            .config
            .validate()
            .map_err(|e| VeilMarketError::initialization(e.to_string()))?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| VeilMarketError::initialization(e.to_string()))?;

        tracing::info!(
            nodes = state.config.nodes.len(),
            org = %state.config.credentials.org_did,
            "storage cluster connection established"
        );

        state.conn = Connection::Ready(client.clone());
        Ok((client, state.config.clone()))
    }
}

async fn post_node(
    client: &reqwest::Client,
    config: &ClusterConfig,
    node_url: &str,
    path: &str,
    body: &impl Serialize,
) -> std::result::Result<reqwest::Response, String> {
    let url = format!("{}{}", node_url.trim_end_matches('/'), path);
    let response = client
        .post(&url)
        .bearer_auth(&config.credentials.secret_key)
        .header("X-Org-Did", &config.credentials.org_did)
        .json(body)
        .send()
        .await
        .map_err(|e| format!("{}: {}", url, e))?;

    if !response.status().is_success() {
        return Err(format!("{}: HTTP {}", url, response.status()));
    }
    Ok(response)
}

#[derive(Serialize)]
struct CreateSchemaRequest<'a> {
    #[serde(rename = "_id")]
    id: &'a RemoteSchemaId,
    name: &'a str,
    schema: &'a Value,
}

#[derive(Serialize)]
struct CreateDataRequest<'a> {
    schema: &'a RemoteSchemaId,
    data: &'a [Value],
}

#[derive(Deserialize)]
struct CreateDataResponse {
    #[serde(default)]
    created: Vec<String>,
}

#[derive(Serialize)]
struct ReadDataRequest<'a> {
    schema: &'a RemoteSchemaId,
    filter: &'a Value,
}

#[derive(Deserialize)]
struct ReadDataResponse {
    #[serde(default)]
    data: Vec<Value>,
}

#[async_trait]
impl VaultStore for VaultGateway {
    async fn reconfigure(&self, config: ClusterConfig) -> Result<()> {
        let mut state = self.state.write().await;
        tracing::info!(
            nodes = config.nodes.len(),
            secret_key = %config.secret_key_masked(),
            "cluster reconfigured; connection will be re-established on next use"
        );
        state.config = config;
        state.conn = Connection::Uninitialized;
        Ok(())
    }

    async fn create_schema(
        &self,
        kind: SchemaKind,
        title: &str,
        document: Value,
    ) -> Result<RemoteSchemaId> {
        let (client, config) = self.ensure_ready().await?;

        // The same identifier is registered on every node so the cluster
        // agrees on the collection's key.
        let id = RemoteSchemaId::new();
        let request = CreateSchemaRequest {
            id: &id,
            name: title,
            schema: &document,
        };

        for node in &config.nodes {
            post_node(&client, &config, &node.url, "/api/v1/schemas", &request)
                .await
                .map_err(|message| VeilMarketError::SchemaCreation { kind, message })?;
        }

        tracing::info!(%kind, schema_id = %id, "remote schema registered");
        Ok(id)
    }

    async fn submit_batch(
        &self,
        schema: &RemoteSchemaId,
        records: Vec<Value>,
    ) -> Result<Vec<String>> {
        let (client, config) = self.ensure_ready().await?;
        let request = CreateDataRequest {
            schema,
            data: &records,
        };

        let mut created = Vec::new();
        for (i, node) in config.nodes.iter().enumerate() {
            let response =
                post_node(&client, &config, &node.url, "/api/v1/data/create", &request)
                    .await
                    .map_err(VeilMarketError::write)?;

            if i == 0 {
                let parsed: CreateDataResponse = response
                    .json()
                    .await
                    .map_err(|e| VeilMarketError::write(e.to_string()))?;
                created = parsed.created;
            }
        }

        tracing::debug!(schema_id = %schema, count = created.len(), "record batch accepted");
        Ok(created)
    }

    async fn query(&self, schema: &RemoteSchemaId, filter: Value) -> Result<Vec<Value>> {
        let (client, config) = self.ensure_ready().await?;
        let node = config
            .nodes
            .first()
            .ok_or_else(|| VeilMarketError::read("no storage nodes configured"))?;

        let request = ReadDataRequest {
            schema,
            filter: &filter,
        };
        let response = post_node(&client, &config, &node.url, "/api/v1/data/read", &request)
            .await
            .map_err(VeilMarketError::read)?;

        let parsed: ReadDataResponse = response
            .json()
            .await
            .map_err(|e| VeilMarketError::read(e.to_string()))?;

        tracing::debug!(schema_id = %schema, count = parsed.data.len(), "query answered");
        Ok(parsed.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Credentials, NodeConfig};

    fn valid_config() -> ClusterConfig {
        ClusterConfig {
            nodes: vec![NodeConfig {
                url: "https://node-1.example.com".to_string(),
                did: "did:node:1".to_string(),
            }],
            credentials: Credentials {
                org_did: "did:org:demo".to_string(),
                secret_key: "sk-demo".to_string(),
            },
        }
    }

    fn broken_config() -> ClusterConfig {
        ClusterConfig {
            nodes: vec![],
            credentials: Credentials {
                org_did: "did:org:demo".to_string(),
                secret_key: "sk-demo".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_initialization_failure_reports_and_stays_uninitialized() {
        let gateway = VaultGateway::new(broken_config());

        let err = gateway.ensure_ready().await.unwrap_err();
        assert_eq!(err.error_code(), "INITIALIZATION_FAILED");

        // The next attempt fails the same way rather than observing a
        // half-built connection.
        let err = gateway.ensure_ready().await.unwrap_err();
        assert_eq!(err.error_code(), "INITIALIZATION_FAILED");
    }

    #[tokio::test]
    async fn test_first_use_establishes_the_connection() {
        let gateway = VaultGateway::new(valid_config());
        assert!(gateway.ensure_ready().await.is_ok());
    }

    #[tokio::test]
    async fn test_reconfigure_resets_then_recovers() {
        let gateway = VaultGateway::new(broken_config());
        assert!(gateway.ensure_ready().await.is_err());

        gateway.reconfigure(valid_config()).await.unwrap();
        assert!(gateway.ensure_ready().await.is_ok());
    }
}
