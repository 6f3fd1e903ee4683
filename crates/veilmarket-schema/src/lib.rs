//! VeilMarket Schema - The structural contracts at the action boundary
//!
//! Two halves, both pure data:
//!
//! - [`input`]: one deserializable struct per action. Unknown fields are
//!   rejected by serde, unknown status values are rejected by the closed
//!   enums in `veilmarket-types`, and `validate()` enforces the value
//!   constraints (minimum duration, rating range, non-empty identifiers).
//! - [`remote`]: the JSON-Schema documents registered with the storage
//!   cluster, one per record kind, declaring which fields arrive in
//!   secret-share form.

pub mod input;
pub mod remote;

pub use input::*;
pub use remote::*;
