//! Token-pair issuance.

use std::sync::Arc;

use chrono::Duration;

use huddle_core::{AuthResult, SubjectId};

use crate::claims::TokenKind;
use crate::codec::TokenCodec;

/// A verified identity as produced by the credential store adapter,
/// annotated with the subject's current revocation epoch.
///
/// Only the revocation ledger may advance `epoch`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: SubjectId,
    pub epoch: u64,
}

/// The two token values handed back on login and refresh.
///
/// Returned once per issuance event and never persisted by the core:
/// a token only ever re-enters as an opaque string on a later request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Mints access/refresh pairs for verified identities.
///
/// Issuance has no side effect on the revocation ledger: logging in on a
/// second device does not disturb the first device's pair.
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            codec,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Mint a fresh pair. Both tokens carry the identity's epoch; only the
    /// refresh token's copy is ever checked again.
    pub fn issue(&self, identity: &Identity) -> AuthResult<TokenPair> {
        let access =
            self.codec
                .encode(identity.id, identity.epoch, TokenKind::Access, self.access_ttl)?;
        let refresh = self.codec.encode(
            identity.id,
            identity.epoch,
            TokenKind::Refresh,
            self.refresh_ttl,
        )?;

        Ok(TokenPair { access, refresh })
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            Arc::new(TokenCodec::new(b"test-secret")),
            Duration::minutes(15),
            Duration::days(28),
        )
    }

    #[test]
    fn pair_carries_kind_and_epoch() {
        let issuer = issuer();
        let codec = TokenCodec::new(b"test-secret");
        let identity = Identity {
            id: SubjectId::new(),
            epoch: 7,
        };

        let pair = issuer.issue(&identity).unwrap();

        let access = codec.decode(&pair.access, TokenKind::Access).unwrap();
        assert_eq!(access.sub, identity.id);
        assert_eq!(access.epoch, 7);

        let refresh = codec.decode(&pair.refresh, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.sub, identity.id);
        assert_eq!(refresh.epoch, 7);
        // Refresh lives weeks, access minutes.
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn multi_device_login_yields_independent_pairs() {
        let issuer = issuer();
        let identity = Identity {
            id: SubjectId::new(),
            epoch: 0,
        };

        let a = issuer.issue(&identity).unwrap();
        let b = issuer.issue(&identity).unwrap();

        // Both stand on their own; neither invalidates the other.
        let codec = TokenCodec::new(b"test-secret");
        assert!(codec.decode(&a.refresh, TokenKind::Refresh).is_ok());
        assert!(codec.decode(&b.refresh, TokenKind::Refresh).is_ok());
        assert_ne!(a.access, b.access);
    }
}
