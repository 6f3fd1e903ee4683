//! VeilMarket Actions - The externally invokable operation surface
//!
//! Every operation an agent host can call lives here, one method per
//! action on [`Marketplace`]. The contract at this boundary:
//!
//! - Input arrives as loose JSON and is validated against the action's
//!   schema struct; unrecognized fields are rejected.
//! - Output is always a human-readable `String`. A failure of any kind is
//!   rendered as a one-line `Error: <description>`; no error value ever
//!   crosses this surface.
//! - State (the storage handle, cluster configuration, provisioned schema
//!   identifiers) is owned by the `Marketplace` value, not by the process.

pub mod surface;

pub use surface::*;
