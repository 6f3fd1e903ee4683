//! Cluster configuration
//!
//! The node list and organization credentials are owned by whoever drives
//! the action surface and handed to the gateway explicitly, so concurrent
//! or repeated runs never interfere through process-wide state.

use serde::{Deserialize, Serialize};
use std::fmt;
use veilmarket_types::{Result, VeilMarketError};

/// One storage node of the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Base URL of the node's API
    pub url: String,
    /// Node identifier (DID)
    pub did: String,
}

/// Organization credentials for the cluster
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Organization identifier (DID)
    pub org_did: String,
    /// Organization secret key
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("org_did", &self.org_did)
            .field("secret_key", &mask_secret(&self.secret_key))
            .finish()
    }
}

/// Full cluster configuration: node list plus credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Storage nodes, in connection order
    pub nodes: Vec<NodeConfig>,
    /// Organization credentials
    pub credentials: Credentials,
}

impl ClusterConfig {
    /// Read the cluster configuration from the environment.
    ///
    /// Nodes are numbered from 1 (`VEILMARKET_NODE_1_URL`,
    /// `VEILMARKET_NODE_1_DID`, ...) and read until the first gap.
    pub fn from_env() -> Result<Self> {
        let mut nodes = Vec::new();
        for n in 1.. {
            let url = std::env::var(format!("VEILMARKET_NODE_{}_URL", n));
            let did = std::env::var(format!("VEILMARKET_NODE_{}_DID", n));
            match (url, did) {
                (Ok(url), Ok(did)) => nodes.push(NodeConfig { url, did }),
                _ => break,
            }
        }

        let org_did = std::env::var("VEILMARKET_ORG_DID").map_err(|_| {
            VeilMarketError::configuration("VEILMARKET_ORG_DID must be set")
        })?;
        let secret_key = std::env::var("VEILMARKET_ORG_SECRET_KEY").map_err(|_| {
            VeilMarketError::configuration("VEILMARKET_ORG_SECRET_KEY must be set")
        })?;

        let config = Self {
            nodes,
            credentials: Credentials {
                org_did,
                secret_key,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable for connecting
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(VeilMarketError::configuration(
                "no storage nodes configured",
            ));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.url.trim().is_empty() {
                return Err(VeilMarketError::configuration(format!(
                    "node {} has an empty url",
                    i + 1
                )));
            }
            if node.did.trim().is_empty() {
                return Err(VeilMarketError::configuration(format!(
                    "node {} has an empty did",
                    i + 1
                )));
            }
        }
        if self.credentials.org_did.trim().is_empty() {
            return Err(VeilMarketError::configuration("org_did is empty"));
        }
        if self.credentials.secret_key.trim().is_empty() {
            return Err(VeilMarketError::configuration("secret_key is empty"));
        }
        Ok(())
    }

    /// Masked secret key for logging
    pub fn secret_key_masked(&self) -> String {
        mask_secret(&self.credentials.secret_key)
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.len() <= 4 {
        "***".to_string()
    } else {
        format!("{}***", &secret[..4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_config() -> ClusterConfig {
        ClusterConfig {
            nodes: vec![NodeConfig {
                url: "https://node-1.example.com".to_string(),
                did: "did:node:1".to_string(),
            }],
            credentials: Credentials {
                org_did: "did:org:demo".to_string(),
                secret_key: "sk-demo-0123456789".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(demo_config().validate().is_ok());
    }

    #[test]
    fn test_empty_node_list_rejected() {
        let mut config = demo_config();
        config.nodes.clear();
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_FAILED");
    }

    #[test]
    fn test_secret_key_is_masked() {
        let config = demo_config();
        let masked = config.secret_key_masked();
        assert_eq!(masked, "sk-d***");
        assert!(!masked.contains("0123456789"));
    }

    #[test]
    fn test_debug_does_not_leak_the_secret() {
        let config = demo_config();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("0123456789"));
    }
}
