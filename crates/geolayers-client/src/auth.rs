//! Credential injection.
//!
//! The executor asks its [`CredentialProvider`] for the key each time it
//! builds a request, so a rotating provider takes effect on the next attempt.

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Source of the API key sent with every request.
pub trait CredentialProvider: Send + Sync {
    /// The key to attach to the request being built.
    fn api_key(&self) -> String;
}

/// A fixed key, usually the one from the configuration.
#[derive(Clone)]
pub struct StaticApiKey(String);

impl StaticApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl CredentialProvider for StaticApiKey {
    fn api_key(&self) -> String {
        self.0.clone()
    }
}

impl std::fmt::Debug for StaticApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticApiKey(<redacted>)")
    }
}

/// Any `Fn() -> String` closure can supply keys.
impl<F> CredentialProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn api_key(&self) -> String {
        self()
    }
}
