//! Authentication configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `[auth]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enable development mode: requests without a session token run under
    /// the configured shop, and the API secret may be omitted.
    pub dev_mode: bool,

    /// CORS origins of the admin frontend. Local frontends are added in
    /// dev mode.
    pub allowed_origins: Vec<String>,
}

/// Resolve a configured secret. `env:NAME` reads the variable `NAME`; an
/// empty value counts as unset.
pub fn resolve_secret(value: &Option<String>) -> Result<Option<String>, ConfigValidationError> {
    let Some(value) = value.as_deref().filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let Some(name) = value.strip_prefix("env:") else {
        return Ok(Some(value.to_string()));
    };

    match std::env::var(name) {
        Ok(secret) if secret.is_empty() => Err(ConfigValidationError::EnvVarEmpty(name.to_string())),
        Ok(secret) => Ok(Some(secret)),
        Err(_) => Err(ConfigValidationError::EnvVarNotFound(name.to_string())),
    }
}

/// Startup configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("shopify.shop is required (set LMA__SHOPIFY__SHOP or `shop` under [shopify])")]
    MissingShop,

    #[error("shopify.access_token is required to call the Admin API")]
    MissingAccessToken,

    /// Session tokens and proxy signatures cannot be checked without it.
    #[error("shopify.api_secret is required unless auth.dev_mode is set")]
    MissingApiSecret,

    #[error("environment variable '{0}' referenced via env:{0} is not set")]
    EnvVarNotFound(String),

    #[error("environment variable '{0}' referenced via env:{0} is empty")]
    EnvVarEmpty(String),
}
