//! Request context attached by the guards.

use huddle_core::SubjectId;

/// Who is making the request.
///
/// A tagged variant rather than an identity-plus-flag, so downstream
/// authorization decisions stay exhaustive: matching on `Caller` forces a
/// handler to say what a peer service may do that an end user may not.
/// Guards insert this into request extensions; handlers must read it from
/// there and never re-derive it from raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// A logged-in human, verified via an access token.
    User { subject: SubjectId },
    /// A trusted sibling microservice, verified via its shared secret.
    Peer { service: String },
}

impl Caller {
    pub fn subject(&self) -> Option<SubjectId> {
        match self {
            Caller::User { subject } => Some(*subject),
            Caller::Peer { .. } => None,
        }
    }

    pub fn is_peer(&self) -> bool {
        matches!(self, Caller::Peer { .. })
    }
}
