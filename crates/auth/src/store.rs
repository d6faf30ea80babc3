//! Credential store adapter.
//!
//! The user database is an external collaborator; the core only needs the
//! contract below. Password hashing is deliberately opaque to everything
//! outside this module: callers hand over the raw secret and get a yes/no.

use std::collections::HashMap;
use std::sync::Mutex;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use huddle_core::{AuthError, AuthResult, SubjectId};

/// The subset of a user record the session core is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: SubjectId,
    pub email: String,
}

/// Registration failure (collaborator-surface, not part of the guard
/// taxonomy).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("email already registered")]
    EmailTaken,

    #[error("credential store unavailable")]
    Upstream,
}

/// Contract against the user database.
///
/// These are the core's only I/O suspension points besides the ledger; all
/// methods must tolerate concurrent calls.
pub trait CredentialStore: Send + Sync {
    /// Confirm the subject exists and the secret matches.
    /// Fails with [`AuthError::Unauthenticated`] on unknown email or wrong
    /// password, indistinguishably.
    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = AuthResult<SubjectId>> + Send;

    /// Resolve a subject that authenticated earlier. Used on the refresh
    /// path to catch accounts that disappeared or were disabled after the
    /// refresh token was minted.
    fn find_subject(&self, id: SubjectId) -> impl Future<Output = AuthResult<Profile>> + Send;

    /// Look up a subject id by email. Peer-service surface.
    fn identity_by_email(&self, email: &str) -> impl Future<Output = AuthResult<SubjectId>> + Send;

    /// Whether an email is still free to register.
    fn email_available(&self, email: &str) -> impl Future<Output = AuthResult<bool>> + Send;

    /// Every registered profile. Peer-service surface (directory listing).
    fn subjects(&self) -> impl Future<Output = AuthResult<Vec<Profile>>> + Send;

    /// Create a new credential record.
    fn register(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<SubjectId, RegisterError>> + Send;
}

#[derive(Debug)]
struct UserRecord {
    id: SubjectId,
    password_hash: String,
}

/// In-process credential store hashing with Argon2.
///
/// Backs the dev/test deployment; production points the same trait at the
/// real user database.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Login identifiers are case-insensitive.
fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl CredentialStore for InMemoryCredentialStore {
    async fn verify_credentials(&self, email: &str, password: &str) -> AuthResult<SubjectId> {
        // Copy the record out so the lock is not held across the hash
        // verification, which costs real CPU time.
        let (id, password_hash) = {
            let users = self.users.lock().expect("store mutex poisoned");
            let record = users
                .get(&normalize(email))
                .ok_or(AuthError::Unauthenticated)?;
            (record.id, record.password_hash.clone())
        };

        let parsed =
            PasswordHash::new(&password_hash).map_err(|_| AuthError::UpstreamUnavailable)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::Unauthenticated)?;

        Ok(id)
    }

    async fn find_subject(&self, id: SubjectId) -> AuthResult<Profile> {
        let users = self.users.lock().expect("store mutex poisoned");
        users
            .iter()
            .find(|(_, record)| record.id == id)
            .map(|(email, record)| Profile {
                id: record.id,
                email: email.clone(),
            })
            .ok_or(AuthError::Unauthenticated)
    }

    async fn identity_by_email(&self, email: &str) -> AuthResult<SubjectId> {
        let users = self.users.lock().expect("store mutex poisoned");
        users
            .get(&normalize(email))
            .map(|record| record.id)
            .ok_or(AuthError::Unauthenticated)
    }

    async fn email_available(&self, email: &str) -> AuthResult<bool> {
        let users = self.users.lock().expect("store mutex poisoned");
        Ok(!users.contains_key(&normalize(email)))
    }

    async fn subjects(&self) -> AuthResult<Vec<Profile>> {
        let users = self.users.lock().expect("store mutex poisoned");
        Ok(users
            .iter()
            .map(|(email, record)| Profile {
                id: record.id,
                email: email.clone(),
            })
            .collect())
    }

    async fn register(&self, email: &str, password: &str) -> Result<SubjectId, RegisterError> {
        // 122 random bits of salt per credential.
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(|e| {
            tracing::error!(error = %e, "salt encoding failed");
            RegisterError::Upstream
        })?;
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                RegisterError::Upstream
            })?
            .to_string();

        let mut users = self.users.lock().expect("store mutex poisoned");
        let email = normalize(email);
        if users.contains_key(&email) {
            return Err(RegisterError::EmailTaken);
        }

        let id = SubjectId::new();
        users.insert(email, UserRecord { id, password_hash });
        Ok(id)
    }
}
