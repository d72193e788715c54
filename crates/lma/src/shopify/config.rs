//! Admin API configuration.

use serde::{Deserialize, Serialize};

use crate::auth::{ConfigValidationError, resolve_secret};

/// Admin API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopifyConfig {
    /// App API key (the audience of admin session tokens).
    pub api_key: Option<String>,

    /// App API secret. Signs session tokens and app proxy requests.
    /// Supports `env:VAR_NAME`.
    pub api_secret: Option<String>,

    /// Admin API version segment, e.g. "2024-10".
    pub api_version: String,

    /// Shop domain the app is installed on, e.g. "academy.myshopify.com".
    pub shop: Option<String>,

    /// Offline access token for `shop`. Supports `env:VAR_NAME`.
    pub access_token: Option<String>,

    /// Override for the Admin API origin (defaults to `https://{shop}`).
    pub admin_base_url: Option<String>,

    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,

    /// Metafield namespace holding the LMS keys.
    pub namespace: String,

    /// Fixed page sizes for list and reference queries.
    pub pages: PageSizes,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            api_version: "2024-10".to_string(),
            shop: None,
            access_token: None,
            admin_base_url: None,
            timeout_secs: 30,
            namespace: "custom".to_string(),
            pages: PageSizes::default(),
        }
    }
}

impl ShopifyConfig {
    /// Resolve `env:` indirections in the secrets.
    pub fn resolved(mut self) -> Result<Self, ConfigValidationError> {
        self.api_secret = resolve_secret(&self.api_secret)?;
        self.access_token = resolve_secret(&self.access_token)?;
        Ok(self)
    }

    /// Validate the configuration.
    ///
    /// The shop and its access token are always needed to reach the Admin
    /// API; the API secret can be omitted only in dev mode.
    pub fn validate(&self, dev_mode: bool) -> Result<(), ConfigValidationError> {
        if self.shop.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigValidationError::MissingShop);
        }
        if resolve_secret(&self.access_token)?.is_none() {
            return Err(ConfigValidationError::MissingAccessToken);
        }
        if !dev_mode && resolve_secret(&self.api_secret)?.is_none() {
            return Err(ConfigValidationError::MissingApiSecret);
        }
        Ok(())
    }
}

/// Page sizes used for each upstream list.
///
/// Lists longer than these are truncated without error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSizes {
    pub courses: u32,
    pub customers: u32,
    pub metafields: u32,
    pub references: u32,
    pub registered_courses: u32,
    pub completed_lessons: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            courses: 50,
            customers: 50,
            metafields: 10,
            references: 50,
            registered_courses: 50,
            completed_lessons: 100,
        }
    }
}
