//! Service wiring shared by the route handlers.

use std::sync::{Arc, Mutex};

use huddle_auth::{
    InMemoryCredentialStore, InMemoryRevocationLedger, SessionService, TokenCodec,
};

use crate::app::dto::EventResponse;
use crate::config::AppConfig;

/// Concrete session service for this deployment: in-process credential
/// store and ledger (single-instance; see DESIGN.md for the durability
/// caveat).
pub type Sessions = SessionService<InMemoryCredentialStore, InMemoryRevocationLedger>;

/// Everything the handlers need, built once and shared via `Extension`.
pub struct AppServices {
    pub sessions: Sessions,
    pub store: Arc<InMemoryCredentialStore>,
    /// Minimal event persistence so the guard composition has a real
    /// downstream consumer. Domain persistence proper is out of scope.
    pub events: Mutex<Vec<EventResponse>>,
}

pub fn build_services(config: &AppConfig, codec: Arc<TokenCodec>) -> AppServices {
    let store = Arc::new(InMemoryCredentialStore::new());
    let ledger = Arc::new(InMemoryRevocationLedger::new());
    let sessions = SessionService::new(Arc::clone(&store), ledger, codec, config.session());

    AppServices {
        sessions,
        store,
        events: Mutex::new(Vec::new()),
    }
}
