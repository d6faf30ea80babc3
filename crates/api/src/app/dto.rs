//! Request/response DTOs and their JSON shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use huddle_core::SubjectId;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Body returned on login and refresh. The refresh token is deliberately
/// absent: it travels only in the `/auth`-scoped cookie.
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub email: String,
}

/// Peer services select whose profile to read; end users always get their
/// own.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub user_id: Option<SubjectId>,
}

#[derive(Debug, Deserialize)]
pub struct EventBody {
    pub title: String,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub owner: SubjectId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
}
