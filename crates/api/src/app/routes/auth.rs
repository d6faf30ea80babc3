//! Session lifecycle endpoints: login, registration, refresh, logout.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;

use huddle_auth::{CredentialStore, RegisterError, TokenPair};
use huddle_core::AuthError;

use crate::app::cookie;
use crate::app::dto::{AccessTokenResponse, LoginRequest, RegisterRequest};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/registration", post(registration))
        .route("/refresh", get(refresh))
        .route("/logout", delete(logout))
}

/// POST /auth/login
///
/// Verifies credentials and starts a session: access token in the body,
/// refresh token in the `/auth`-scoped cookie.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    match services.sessions.login(&body.email, &body.password).await {
        Ok(pair) => pair_response(StatusCode::OK, pair, &services),
        Err(e) => errors::auth_error_response(&e),
    }
}

/// POST /auth/registration
pub async fn registration(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterRequest>,
) -> Response {
    match services.store.register(&body.email, &body.password).await {
        Ok(id) => {
            tracing::info!(subject = %id, "new credential registered");
            (StatusCode::CREATED, Json(json!({ "message": "OK" }))).into_response()
        }
        Err(RegisterError::EmailTaken) => errors::json_error(
            StatusCode::CONFLICT,
            "email_taken",
            "email already registered",
        ),
        Err(RegisterError::Upstream) => {
            errors::auth_error_response(&AuthError::UpstreamUnavailable)
        }
    }
}

/// GET /auth/refresh
///
/// Rotates the pair carried by the refresh cookie. The old cookie value is
/// replaced; it is not individually revoked (epoch semantics, see
/// `huddle-auth`).
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = cookie::refresh_token_from(&headers) else {
        return errors::auth_error_response(&AuthError::Unauthenticated);
    };

    match services.sessions.refresh(&token).await {
        Ok(pair) => pair_response(StatusCode::OK, pair, &services),
        Err(e) => errors::auth_error_response(&e),
    }
}

/// DELETE /auth/logout
///
/// Bumps the subject's revocation epoch (killing every outstanding refresh
/// token) and clears the cookie.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = cookie::refresh_token_from(&headers) else {
        return errors::auth_error_response(&AuthError::Unauthenticated);
    };

    match services.sessions.logout(&token).await {
        Ok(()) => (
            StatusCode::NO_CONTENT,
            [(header::SET_COOKIE, cookie::clear_refresh_cookie())],
        )
            .into_response(),
        Err(e) => errors::auth_error_response(&e),
    }
}

fn pair_response(status: StatusCode, pair: TokenPair, services: &AppServices) -> Response {
    let cookie = cookie::set_refresh_cookie(&pair.refresh, services.sessions.refresh_ttl());
    (
        status,
        [(header::SET_COOKIE, cookie)],
        Json(AccessTokenResponse {
            access_token: pair.access,
        }),
    )
        .into_response()
}
