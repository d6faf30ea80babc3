//! Event endpoints — the end-user surface that exercises the identity
//! guard. Persistence here is an in-memory stand-in; the guard composition
//! is the point.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;

use huddle_core::AuthError;

use crate::app::dto::{EventBody, EventResponse};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::Caller;

pub fn router() -> Router {
    Router::new().route("/", get(list).post(create))
}

/// GET /events — the caller's own events.
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> Response {
    let Some(subject) = caller.subject() else {
        return errors::auth_error_response(&AuthError::Forbidden);
    };

    let events = services.events.lock().expect("events mutex poisoned");
    let own: Vec<EventResponse> = events
        .iter()
        .filter(|e| e.owner == subject)
        .cloned()
        .collect();
    Json(own).into_response()
}

/// POST /events
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<EventBody>,
) -> Response {
    let Some(subject) = caller.subject() else {
        return errors::auth_error_response(&AuthError::Forbidden);
    };

    let event = EventResponse {
        id: Uuid::now_v7(),
        owner: subject,
        title: body.title,
        starts_at: body.starts_at,
    };

    services
        .events
        .lock()
        .expect("events mutex poisoned")
        .push(event.clone());

    (StatusCode::CREATED, Json(event)).into_response()
}
