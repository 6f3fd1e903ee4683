//! VeilMarket Vault - Integration with the external encrypted-storage cluster
//!
//! Three pieces:
//!
//! - [`marker`]: rewrites confidential fields of an outgoing record into
//!   the `{"%share": value}` wrapper the cluster recognizes as "secret-share
//!   this value". Pure data transformation; no cryptography happens here.
//! - [`config`]: the node list and organization credentials, explicitly
//!   passed rather than read from process-wide state.
//! - [`gateway`]: the [`VaultStore`] capability trait and its HTTP
//!   implementation. The gateway owns the lazy two-state connection
//!   (uninitialized until first use, reset by reconfiguration) and nothing
//!   else: no retries, no caching, no consistency reconciliation. Those
//!   guarantees, where they exist, belong to the cluster.

pub mod config;
pub mod gateway;
pub mod marker;
pub mod store;

pub use config::*;
pub use gateway::*;
pub use marker::*;
pub use store::*;
