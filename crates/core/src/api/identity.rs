/// The identity collaborator: something that can produce the current
/// bearer credential.
///
/// The tracker does not participate in the authentication protocol — it
/// receives an already-resolved credential source and attaches whatever it
/// yields to outgoing requests.
pub trait IdentityProvider: Send + Sync {
    /// The current bearer token, or `None` when signed out.
    fn id_token(&self) -> Option<String>;
}

/// A fixed, pre-issued token (service accounts, tests).
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl IdentityProvider for StaticToken {
    fn id_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No credential; requests go out unauthenticated.
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn id_token(&self) -> Option<String> {
        None
    }
}
