//! `huddle-auth` — token lifecycle and session-authorization core.
//!
//! Credential verification → token-pair issuance → rotation-on-refresh →
//! revocation-on-logout, plus the read-side primitives the request guards
//! are built on. Intentionally decoupled from HTTP and storage: transport
//! lives in `huddle-api`, durable backing behind the traits defined here.

pub mod claims;
pub mod codec;
pub mod issuer;
pub mod ledger;
pub mod peers;
pub mod session;
pub mod store;

pub use claims::{TokenClaims, TokenKind};
pub use codec::TokenCodec;
pub use issuer::{Identity, TokenIssuer, TokenPair};
pub use ledger::{InMemoryRevocationLedger, RevocationLedger};
pub use peers::PeerRegistry;
pub use session::{SessionConfig, SessionService};
pub use store::{CredentialStore, InMemoryCredentialStore, Profile, RegisterError};
