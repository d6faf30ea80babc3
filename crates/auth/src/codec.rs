//! Signed token codec (HS256).
//!
//! Pure encode/decode over [`TokenClaims`]; no I/O. The signing secret is
//! process-wide, loaded once at startup and never mutated.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};

use huddle_core::{AuthError, AuthResult, SubjectId, TokenFault};

use crate::claims::{TokenClaims, TokenKind};

/// Encodes and verifies signed tokens.
///
/// Cheap to share behind an `Arc`; holds the derived keys, not the raw
/// secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: no leeway, so a token is rejected the second
        // its `exp` passes.
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Mint a signed token for `sub` with the given kind and lifetime.
    pub fn encode(
        &self,
        sub: SubjectId,
        epoch: u64,
        kind: TokenKind,
        ttl: Duration,
    ) -> AuthResult<String> {
        self.encode_at(sub, epoch, kind, Utc::now().timestamp(), ttl)
    }

    /// Mint with an explicit issued-at. Tests use this to produce
    /// already-expired tokens without sleeping.
    fn encode_at(
        &self,
        sub: SubjectId,
        epoch: u64,
        kind: TokenKind,
        iat: i64,
        ttl: Duration,
    ) -> AuthResult<String> {
        let claims = TokenClaims {
            sub,
            jti: uuid::Uuid::now_v7(),
            epoch,
            kind,
            iat,
            exp: iat + ttl.num_seconds(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| {
                tracing::error!(error = %e, "token encoding failed");
                AuthError::UpstreamUnavailable
            },
        )
    }

    /// Verify signature, structure, and expiry, then check the token is of
    /// the expected kind. Every fault is a rejection; the sub-reason is for
    /// diagnostics only.
    pub fn decode(&self, token: &str, expected: TokenKind) -> AuthResult<TokenClaims> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let fault = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenFault::Expired,
                    ErrorKind::InvalidSignature => TokenFault::BadSignature,
                    _ => TokenFault::Malformed,
                };
                AuthError::InvalidToken(fault)
            })?;

        if data.claims.kind != expected {
            return Err(AuthError::InvalidToken(TokenFault::WrongKind));
        }

        Ok(data.claims)
    }
}
