//! Normalized auth error taxonomy.
//!
//! Every core-internal failure is folded into one of these kinds before it
//! crosses the guard boundary. Raw storage/driver errors never reach a
//! caller.

use thiserror::Error;

/// Result type used across the session core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Sub-reason for a rejected token.
///
/// Diagnostic only: callers treat every fault identically (reject), but the
/// distinction matters for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFault {
    /// Signature did not verify against the process key.
    BadSignature,
    /// Structurally broken (not a token, missing claims, bad encoding).
    Malformed,
    /// `exp` is in the past.
    Expired,
    /// A refresh token presented where an access token is expected, or
    /// vice versa.
    WrongKind,
}

impl core::fmt::Display for TokenFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            TokenFault::BadSignature => "bad signature",
            TokenFault::Malformed => "malformed",
            TokenFault::Expired => "expired",
            TokenFault::WrongKind => "wrong kind",
        };
        f.write_str(s)
    }
}

/// Auth failure as surfaced at the guard boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The presented token is unusable (recoverable by re-login).
    #[error("invalid token: {0}")]
    InvalidToken(TokenFault),

    /// The token's epoch no longer matches the subject's current epoch
    /// (logged out / all sessions revoked). Same recovery: re-login.
    #[error("token revoked")]
    Revoked,

    /// No usable credential was presented, or the credential check failed.
    #[error("unauthenticated")]
    Unauthenticated,

    /// A valid identity was presented but lacks the required trust level.
    #[error("forbidden")]
    Forbidden,

    /// The credential store or revocation ledger could not be reached.
    /// Surfaced as a 5xx, never silently treated as revocation.
    #[error("upstream unavailable")]
    UpstreamUnavailable,
}
