//! Per-request upstream session.

use std::fmt;

/// Credentials for one shop, resolved per request.
#[derive(Clone, PartialEq, Eq)]
pub struct ShopSession {
    shop: String,
    access_token: String,
}

impl ShopSession {
    pub fn new(shop: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            access_token: access_token.into(),
        }
    }

    /// Shop domain, e.g. "academy.myshopify.com".
    pub fn shop(&self) -> &str {
        &self.shop
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for ShopSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopSession")
            .field("shop", &self.shop)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let session = ShopSession::new("academy.myshopify.com", "shpat_secret");
        let printed = format!("{session:?}");
        assert!(printed.contains("academy.myshopify.com"));
        assert!(!printed.contains("shpat_secret"));
    }
}
