//! Token claims model (transport-agnostic).

use serde::{Deserialize, Serialize};

use huddle_core::SubjectId;

/// What a token is good for.
///
/// Kinds are embedded in the signed payload so a refresh token can never be
/// replayed where an access token is expected, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived, proves identity on every request, not individually
    /// revocable.
    Access,
    /// Long-lived, only good for minting a new pair; collectively
    /// invalidated via an epoch bump.
    Refresh,
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Signed claims carried by every token.
///
/// `iat`/`exp` are Unix-epoch seconds so the JWT layer validates expiry
/// natively. `epoch` is the subject's revocation counter at mint time;
/// it is checked on the refresh path only (access tokens ride out their
/// short TTL even after logout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier.
    pub sub: SubjectId,

    /// Unique token id. Makes every minted token a distinct value even when
    /// two are issued for the same subject within the same second.
    pub jti: uuid::Uuid,

    /// Revocation epoch at mint time.
    pub epoch: u64,

    /// Access or refresh.
    pub kind: TokenKind,

    /// Issued-at, Unix seconds.
    pub iat: i64,

    /// Expiry, Unix seconds.
    pub exp: i64,
}
