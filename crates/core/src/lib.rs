//! `huddle-core` — shared foundation for the huddle microservices.
//!
//! This crate contains **pure** primitives (identifiers, the normalized
//! auth error taxonomy). No I/O, no framework concerns.

pub mod error;
pub mod id;

pub use error::{AuthError, AuthResult, TokenFault};
pub use id::SubjectId;
