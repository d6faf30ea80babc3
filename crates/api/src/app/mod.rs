//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: constructed-once dependencies (session core, stores)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses
//! - `cookie.rs`: refresh-token cookie transport

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use huddle_auth::{PeerRegistry, TokenCodec};

use crate::config::AppConfig;
use crate::middleware::{self, GuardState};

pub mod cookie;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: AppConfig) -> Router {
    let codec = Arc::new(TokenCodec::new(config.jwt_secret.as_bytes()));
    let peers = Arc::new(PeerRegistry::from_spec(&config.peer_secrets));
    if peers.is_empty() {
        tracing::info!("no peer secrets configured; peer-only endpoints will reject everything");
    }

    let guard_state = GuardState {
        codec: Arc::clone(&codec),
        peers,
    };
    let services = Arc::new(services::build_services(&config, codec));

    // End-user surface: access token required.
    let user_only = Router::new()
        .route("/whoami", get(routes::system::whoami))
        .nest("/events", routes::events::router())
        .layer(axum::middleware::from_fn_with_state(
            guard_state.clone(),
            middleware::identity_guard,
        ));

    // Mixed surface: peers pick a user, end users get themselves.
    let user_or_peer = Router::new()
        .route("/users/profile", get(routes::users::profile))
        .layer(axum::middleware::from_fn_with_state(
            guard_state.clone(),
            middleware::peer_or_identity_guard,
        ));

    // Peer-only surface.
    let peer_only = Router::new()
        .route("/users/all", get(routes::users::all))
        .route("/users/identity/:email", get(routes::users::identity_by_email))
        .layer(axum::middleware::from_fn_with_state(
            guard_state.clone(),
            middleware::peer_guard,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/users/registration/availability",
            get(routes::users::availability),
        )
        .nest("/auth", routes::auth::router())
        .merge(user_only)
        .merge(user_or_peer)
        .merge(peer_only)
        .layer(Extension(services))
}
