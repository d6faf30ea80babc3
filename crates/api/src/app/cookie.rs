//! Refresh-token cookie transport.
//!
//! The refresh token never travels in a response body: it rides in a
//! Secure/HttpOnly cookie scoped to the `/auth` path, invisible to page
//! scripts, with a lifetime matching the refresh token's own TTL.

use axum::http::{HeaderMap, header};
use chrono::Duration;

/// Name of the refresh token cookie.
pub const AUTH_COOKIE: &str = "__auth";

/// `Set-Cookie` value installing a refresh token.
pub fn set_refresh_cookie(token: &str, max_age: Duration) -> String {
    format!(
        "{AUTH_COOKIE}={token}; Max-Age={}; Path=/auth; Secure; HttpOnly; SameSite=None",
        max_age.num_seconds()
    )
}

/// `Set-Cookie` value removing the refresh token. The attributes must match
/// the ones used when setting it, or browsers keep the original cookie.
pub fn clear_refresh_cookie() -> String {
    format!("{AUTH_COOKIE}=; Max-Age=0; Path=/auth; Secure; HttpOnly; SameSite=None")
}

/// Extract the refresh token from the request's `Cookie` header(s).
pub fn refresh_token_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, token)| token.to_string())
}
