//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - IDs are serialised as hex strings.
//! - Field names are camelCase.

mod id;
pub mod question;
pub mod quiz;
pub mod waitlist;

pub use id::ApiId;
