//! User-facing and peer-facing identity endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use huddle_auth::CredentialStore;
use huddle_core::{AuthError, SubjectId};

use crate::app::dto::{AvailabilityQuery, ProfileQuery};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::Caller;

/// GET /users/profile
///
/// Behind the permissive guard: an end user reads their own profile; a
/// peer service must say whose profile it wants via `user_id`.
pub async fn profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<ProfileQuery>,
) -> Response {
    let subject: SubjectId = match &caller {
        Caller::User { subject } => *subject,
        Caller::Peer { service } => match query.user_id {
            Some(id) => {
                tracing::debug!(peer = %service, subject = %id, "peer profile lookup");
                id
            }
            None => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "missing_user_id",
                    "peer calls must pass ?user_id=",
                );
            }
        },
    };

    match services.store.find_subject(subject).await {
        Ok(p) => Json(json!({
            "id": p.id,
            "email": p.email,
            "is_peer_call": caller.is_peer(),
        }))
        .into_response(),
        Err(AuthError::Unauthenticated) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such user")
        }
        Err(e) => errors::auth_error_response(&e),
    }
}

/// GET /users/all — peer-only directory listing.
pub async fn all(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.store.subjects().await {
        Ok(profiles) => Json(profiles).into_response(),
        Err(e) => errors::auth_error_response(&e),
    }
}

/// GET /users/identity/:email — peer-only reverse lookup.
pub async fn identity_by_email(
    Extension(services): Extension<Arc<AppServices>>,
    Path(email): Path<String>,
) -> Response {
    match services.store.identity_by_email(&email).await {
        Ok(id) => Json(json!({ "id": id })).into_response(),
        Err(AuthError::Unauthenticated) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such user")
        }
        Err(e) => errors::auth_error_response(&e),
    }
}

/// GET /users/registration/availability?email= — public pre-registration
/// check.
pub async fn availability(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<AvailabilityQuery>,
) -> Response {
    match services.store.email_available(&query.email).await {
        Ok(available) => Json(json!({ "email": available })).into_response(),
        Err(e) => errors::auth_error_response(&e),
    }
}
