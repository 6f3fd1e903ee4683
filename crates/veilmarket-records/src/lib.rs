//! VeilMarket Records - Assembly of submission-ready records
//!
//! One builder per record kind. A builder takes input the schema layer has
//! already validated, mints a fresh identifier, stamps the kind's initial
//! status fields, and marks the kind's confidential fields for
//! secret-sharing. It performs no validation of its own; it trusts its
//! caller.

pub mod builder;

pub use builder::*;
