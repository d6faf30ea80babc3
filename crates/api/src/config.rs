//! Process configuration, read once from the environment at startup.

use std::time::Duration as StdDuration;

use chrono::Duration;

use huddle_auth::SessionConfig;

/// Everything `main` needs to wire the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HS256 signing secret, shared by every service verifying our tokens.
    pub jwt_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub verify_timeout: StdDuration,
    /// `service:secret,service:secret` allow-list of peer microservices.
    pub peer_secrets: String,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self {
            jwt_secret,
            access_ttl: Duration::minutes(env_i64("JWT_ACCESS_LIFETIME_MINUTES", 15)),
            refresh_ttl: Duration::days(env_i64("JWT_REFRESH_LIFETIME_DAYS", 28)),
            verify_timeout: millis(env_i64("CREDENTIAL_TIMEOUT_MS", 5_000)),
            peer_secrets: std::env::var("PEER_SECRETS").unwrap_or_default(),
            bind_addr: std::env::var("APP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            access_ttl: self.access_ttl,
            refresh_ttl: self.refresh_ttl,
            verify_timeout: self.verify_timeout,
        }
    }
}

/// Negative values (a misconfigured env var) clamp to zero rather than
/// wrapping through the unsigned cast.
fn millis(value: i64) -> StdDuration {
    StdDuration::from_millis(value.max(0) as u64)
}

fn env_i64(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}

impl Default for AppConfig {
    /// Dev/test defaults: 15 minute access tokens, 28 day refresh tokens.
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret".to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(28),
            verify_timeout: StdDuration::from_secs(5),
            peer_secrets: String::new(),
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}
