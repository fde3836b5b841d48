//! API key management.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::error::TrendsError;

/// Default environment variable holding the Riot API key.
pub const API_KEY_VAR: &str = "RIOT_API_KEY";

/// A Riot API key.
#[derive(Clone)]
pub struct ApiKey {
    key: SecretString,
}

impl ApiKey {
    /// Wrap a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::from(key.into()),
        }
    }

    /// Get the key for the request header.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.key.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing the API key.
///
/// Implement this trait to pull the key from a secrets manager instead of
/// the environment.
pub trait CredentialsProvider: Send + Sync {
    /// Get the API key.
    fn api_key(&self) -> &ApiKey;
}

/// Provider that holds the key directly.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    key: ApiKey,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            key: ApiKey::new(api_key),
        }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}

impl CredentialsProvider for Arc<StaticCredentials> {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}

/// Provider that reads the key from the environment.
///
/// By default, reads `RIOT_API_KEY`.
#[derive(Debug)]
pub struct EnvCredentials {
    key: ApiKey,
}

impl EnvCredentials {
    /// Read the key from `RIOT_API_KEY`.
    pub fn from_env() -> Result<Self, TrendsError> {
        Self::from_env_var(API_KEY_VAR)
    }

    /// Read the key from a custom environment variable.
    pub fn from_env_var(var: &str) -> Result<Self, TrendsError> {
        let key = std::env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| TrendsError::Config(format!("environment variable {var} not set")))?;

        Ok(Self {
            key: ApiKey::new(key.trim()),
        })
    }
}

impl CredentialsProvider for EnvCredentials {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}
