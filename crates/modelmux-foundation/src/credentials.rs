//! Provider credential availability.
//!
//! The router never stores or validates credentials; it only asks whether a
//! provider could be called right now, and which credential names are absent
//! when it cannot. Error replies surface those names so operators know what
//! to set.

use crate::candidates::Provider;
use std::collections::HashSet;

/// Environment variables each provider needs before it is callable.
pub const fn required_env(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::Claude => &["ANTHROPIC_API_KEY"],
        Provider::Gemini => &["GEMINI_API_KEY"],
        Provider::Copilot => &["GITHUB_COPILOT_TOKEN"],
        Provider::Codex => &["OPENAI_API_KEY"],
    }
}

/// Answers whether a provider can actually be dispatched to.
pub trait CredentialStore: Send + Sync {
    fn is_available(&self, provider: Provider) -> bool;

    /// Names of the credentials missing for `provider`. Empty when available.
    fn missing_credentials(&self, provider: Provider) -> Vec<String>;
}

/// Reads provider credentials from process environment variables. Empty
/// values count as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn is_available(&self, provider: Provider) -> bool {
        required_env(provider)
            .iter()
            .all(|var| std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false))
    }

    fn missing_credentials(&self, provider: Provider) -> Vec<String> {
        required_env(provider)
            .iter()
            .filter(|var| std::env::var(var).map(|v| v.is_empty()).unwrap_or(true))
            .map(|var| var.to_string())
            .collect()
    }
}

/// Fixed availability, for embedders and tests that do not want environment
/// lookups. Unavailable providers report their usual required variables as
/// missing.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    available: HashSet<Provider>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_providers(providers: &[Provider]) -> Self {
        Self {
            available: providers.iter().copied().collect(),
        }
    }

    pub fn allow(mut self, provider: Provider) -> Self {
        self.available.insert(provider);
        self
    }
}

impl CredentialStore for StaticCredentialStore {
    fn is_available(&self, provider: Provider) -> bool {
        self.available.contains(&provider)
    }

    fn missing_credentials(&self, provider: Provider) -> Vec<String> {
        if self.is_available(provider) {
            Vec::new()
        } else {
            required_env(provider)
                .iter()
                .map(|var| var.to_string())
                .collect()
        }
    }
}
