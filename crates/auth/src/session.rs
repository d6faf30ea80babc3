//! Session lifecycle: login, rotation-on-refresh, revocation-on-logout.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;

use huddle_core::{AuthError, AuthResult, SubjectId};

use crate::claims::TokenKind;
use crate::codec::TokenCodec;
use crate::issuer::{Identity, TokenIssuer, TokenPair};
use crate::ledger::RevocationLedger;
use crate::store::{CredentialStore, Profile};

/// Lifetimes and budgets for the session core.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Upper bound on a single credential-store round trip.
    pub verify_timeout: StdDuration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(28),
            verify_timeout: StdDuration::from_secs(5),
        }
    }
}

const UPSTREAM_RETRY_BACKOFF: StdDuration = StdDuration::from_millis(50);

/// Coordinates the credential store, revocation ledger, and token issuer.
///
/// Shared state is limited to the ledger's per-subject counters, so
/// concurrent logins and refreshes for the same subject need no mutual
/// exclusion: every call mints an independent pair.
pub struct SessionService<S, L> {
    store: Arc<S>,
    ledger: Arc<L>,
    codec: Arc<TokenCodec>,
    issuer: TokenIssuer,
    verify_timeout: StdDuration,
}

impl<S: CredentialStore, L: RevocationLedger> SessionService<S, L> {
    pub fn new(store: Arc<S>, ledger: Arc<L>, codec: Arc<TokenCodec>, config: SessionConfig) -> Self {
        let issuer = TokenIssuer::new(Arc::clone(&codec), config.access_ttl, config.refresh_ttl);
        Self {
            store,
            ledger,
            codec,
            issuer,
            verify_timeout: config.verify_timeout,
        }
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.issuer.refresh_ttl()
    }

    /// Verify credentials and mint a pair at the subject's current epoch.
    ///
    /// The credential check runs under a time budget; hitting it is an
    /// `Unauthenticated` for the caller but a distinct log line for
    /// operators.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let verify = self.store.verify_credentials(email, password);
        let id = match tokio::time::timeout(self.verify_timeout, verify).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(timeout_ms = self.verify_timeout.as_millis() as u64,
                    "credential verification timed out");
                return Err(AuthError::Unauthenticated);
            }
        };

        let identity = Identity {
            id,
            epoch: self.ledger.current_epoch(id),
        };
        self.issuer.issue(&identity)
    }

    /// Rotate: trade a still-valid refresh token for a brand-new pair.
    ///
    /// The epoch is *not* bumped here; rotation changes the token values,
    /// not their blast radius. A leaked-and-used refresh token and a
    /// never-used one stay valid alike until the subject's epoch changes
    /// or they expire.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.codec.decode(refresh_token, TokenKind::Refresh)?;

        let current = self.ledger.current_epoch(claims.sub);
        if claims.epoch != current {
            tracing::debug!(subject = %claims.sub, token_epoch = claims.epoch,
                current_epoch = current, "stale-epoch refresh rejected");
            return Err(AuthError::Revoked);
        }

        // Liveness re-check: a subject deleted or disabled since mint time
        // must not be able to rotate, even at a matching epoch.
        let profile = match self.find_subject_bounded(claims.sub).await {
            Err(AuthError::UpstreamUnavailable) => {
                // One retry with a short backoff, then surface as 5xx.
                tokio::time::sleep(UPSTREAM_RETRY_BACKOFF).await;
                self.find_subject_bounded(claims.sub).await?
            }
            other => other?,
        };

        let identity = Identity {
            id: profile.id,
            epoch: current,
        };
        self.issuer.issue(&identity)
    }

    /// Credential-store round trips share one time budget. A hit is an
    /// ordinary rejection for the caller but gets its own log line.
    async fn find_subject_bounded(&self, id: SubjectId) -> AuthResult<Profile> {
        match tokio::time::timeout(self.verify_timeout, self.store.find_subject(id)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(subject = %id, timeout_ms = self.verify_timeout.as_millis() as u64,
                    "credential store lookup timed out");
                Err(AuthError::Unauthenticated)
            }
        }
    }

    /// Invalidate every outstanding refresh token for the token's subject.
    ///
    /// Best-effort idempotent: logging out twice bumps twice, which changes
    /// nothing observable (both stale epochs are equally dead). The token
    /// itself must still carry a valid signature and be unexpired.
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        let claims = self.codec.decode(refresh_token, TokenKind::Refresh)?;

        let epoch = self.ledger.bump(claims.sub);
        tracing::info!(subject = %claims.sub, epoch, "sessions revoked");
        Ok(())
    }
}
