//! The storage capability trait
//!
//! Everything above this crate talks to the cluster through [`VaultStore`]
//! and nothing else, so the HTTP client library never leaks into the
//! action surface and tests can substitute an in-memory double.

use async_trait::async_trait;
use serde_json::Value;
use veilmarket_types::{RemoteSchemaId, Result, SchemaKind};

use crate::ClusterConfig;

/// Narrow capability interface over the encrypted-storage cluster
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Replace the node list and credentials; the connection is
    /// re-established on the next operation
    async fn reconfigure(&self, config: ClusterConfig) -> Result<()>;

    /// Register a structural schema for `kind` and return its identifier
    async fn create_schema(
        &self,
        kind: SchemaKind,
        title: &str,
        document: Value,
    ) -> Result<RemoteSchemaId>;

    /// Submit a batch of prepared records; returns the assigned identifiers
    async fn submit_batch(
        &self,
        schema: &RemoteSchemaId,
        records: Vec<Value>,
    ) -> Result<Vec<String>>;

    /// Query records matching a filter mapping, as delivered by the cluster
    async fn query(&self, schema: &RemoteSchemaId, filter: Value) -> Result<Vec<Value>>;
}
