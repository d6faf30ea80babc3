use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::context::Caller;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /whoami — echoes what the guard attached, mostly for debugging and
/// the black-box tests.
pub async fn whoami(Extension(caller): Extension<Caller>) -> impl IntoResponse {
    match caller {
        Caller::User { subject } => Json(json!({
            "subject_id": subject.to_string(),
            "is_peer_call": false,
        })),
        Caller::Peer { service } => Json(json!({
            "service": service,
            "is_peer_call": true,
        })),
    }
}
