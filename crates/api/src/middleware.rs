//! Request guards.
//!
//! Each guard runs through the same states: unauthenticated → verifying →
//! authorized (request proceeds with a [`Caller`] in its extensions) or
//! rejected (short-circuit before any handler logic). No retries happen
//! inside a guard; retry is the client's concern.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use huddle_auth::{PeerRegistry, TokenCodec, TokenKind};
use huddle_core::{AuthError, AuthResult};

use crate::app::errors;
use crate::context::Caller;

/// Header carrying a peer service's shared secret.
pub const PEER_SECRET_HEADER: &str = "x-service-secret";

/// Read-only trust material shared by all guards: the token codec and the
/// peer allow-list, both loaded once at startup.
#[derive(Clone)]
pub struct GuardState {
    pub codec: Arc<TokenCodec>,
    pub peers: Arc<PeerRegistry>,
}

/// End-user identity guard.
///
/// Verifies the bearer access token with the codec alone: no revocation
/// ledger read, so an access token stays honored for its full short TTL
/// even after logout. That bounded window is the stated design, not a gap.
pub async fn identity_guard(
    State(state): State<GuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match verify_user(&state, req.headers()) {
        Ok(caller) => {
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        Err(e) => errors::auth_error_response(&e),
    }
}

/// Inter-service trust guard, strict mode: only a registered peer gets
/// through.
pub async fn peer_guard(
    State(state): State<GuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match verify_peer(&state, req.headers()) {
        Ok(caller) => {
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        Err(e) => errors::auth_error_response(&e),
    }
}

/// Permissive mode: a peer secret wins if presented (and must then be
/// valid); otherwise the request falls back to the end-user identity path.
pub async fn peer_or_identity_guard(
    State(state): State<GuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let outcome = if req.headers().contains_key(PEER_SECRET_HEADER) {
        verify_peer(&state, req.headers())
    } else {
        verify_user(&state, req.headers())
    };

    match outcome {
        Ok(caller) => {
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        Err(e) => errors::auth_error_response(&e),
    }
}

fn verify_user(state: &GuardState, headers: &HeaderMap) -> AuthResult<Caller> {
    let token = extract_bearer(headers)?;
    let claims = state.codec.decode(token, TokenKind::Access)?;

    Ok(Caller::User {
        subject: claims.sub,
    })
}

fn verify_peer(state: &GuardState, headers: &HeaderMap) -> AuthResult<Caller> {
    let secret = headers
        .get(PEER_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::Forbidden)?;

    let service = state.peers.verify(secret).ok_or_else(|| {
        tracing::warn!("rejected request with unrecognized peer secret");
        AuthError::Forbidden
    })?;

    Ok(Caller::Peer {
        service: service.to_string(),
    })
}

fn extract_bearer(headers: &HeaderMap) -> AuthResult<&str> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Unauthenticated)?;

    let header = header.to_str().map_err(|_| AuthError::Unauthenticated)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }

    Ok(token)
}
