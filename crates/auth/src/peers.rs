//! Registered peer microservices and their shared secrets.

use std::collections::HashMap;

/// Allow-list of sibling services permitted to call peer-only endpoints.
///
/// Static configuration: built once at startup from the environment and
/// never mutated afterwards, so it can be shared read-only across every
/// in-flight request.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    // secret -> service name
    secrets: HashMap<String, String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer service under its shared secret.
    pub fn with_peer(mut self, service: impl Into<String>, secret: impl Into<String>) -> Self {
        self.secrets.insert(secret.into(), service.into());
        self
    }

    /// Parse `service:secret,service:secret` pairs (the env-var format).
    /// Malformed entries are skipped with a warning rather than failing
    /// startup.
    pub fn from_spec(spec: &str) -> Self {
        let mut registry = Self::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once(':') {
                Some((service, secret)) if !service.is_empty() && !secret.is_empty() => {
                    registry = registry.with_peer(service, secret);
                }
                _ => tracing::warn!(entry, "ignoring malformed peer credential entry"),
            }
        }
        registry
    }

    /// Resolve a presented secret to the registered service name.
    pub fn verify(&self, secret: &str) -> Option<&str> {
        self.secrets.get(secret).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_registered_secrets() {
        let registry = PeerRegistry::new()
            .with_peer("event", "s3cret-a")
            .with_peer("user", "s3cret-b");

        assert_eq!(registry.verify("s3cret-a"), Some("event"));
        assert_eq!(registry.verify("s3cret-b"), Some("user"));
        assert_eq!(registry.verify("s3cret-c"), None);
    }

    #[test]
    fn parses_env_spec_and_skips_junk() {
        let registry = PeerRegistry::from_spec("event:abc, user:def ,broken,, :x");

        assert_eq!(registry.verify("abc"), Some("event"));
        assert_eq!(registry.verify("def"), Some("user"));
        assert_eq!(registry.verify("broken"), None);
    }

    #[test]
    fn empty_registry_rejects_everything() {
        let registry = PeerRegistry::from_spec("");
        assert!(registry.is_empty());
        assert_eq!(registry.verify(""), None);
    }
}
