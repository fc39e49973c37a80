//! Authentication for chat-completion requests.
//!
//! Bearer-token authentication with the API key held as a secret.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

/// Authentication provider trait.
///
/// Implementations add credentials to outgoing request headers.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Checks the credentials and logs anything suspicious.
    ///
    /// Never fails: a bad key is reported by the service, not locally.
    fn validate(&self);
}

/// API key authentication provider.
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

/// Last four characters of `key`, or `****` when it is too short to hint at.
///
/// Counts characters, not bytes, so a pasted non-ASCII key cannot split a
/// UTF-8 sequence.
pub(crate) fn key_hint(key: &str) -> String {
    let count = key.chars().count();
    if count > 4 {
        let tail: String = key.chars().skip(count - 4).collect();
        format!("...{}", tail)
    } else {
        "****".to_string()
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key.expose_secret()),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) {
        let key = self.api_key.expose_secret();

        if key.is_empty() {
            tracing::warn!("API key is empty");
        } else if !key.starts_with("sk-") {
            tracing::warn!(
                key_hint = %self.key_hint(),
                "API key does not match expected format (sk-*)"
            );
        }
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}
