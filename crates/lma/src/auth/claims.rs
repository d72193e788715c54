//! Admin session token claims.

use serde::{Deserialize, Serialize};

/// Claims of a session token issued by the Shopify admin to the embedded
/// frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer: the shop admin URL.
    #[serde(default)]
    pub iss: Option<String>,

    /// Destination: the shop origin, e.g. `https://academy.myshopify.com`.
    pub dest: String,

    /// Audience (the app's API key).
    #[serde(default)]
    pub aud: Option<String>,

    /// Subject (staff user id).
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiration time (as Unix timestamp).
    pub exp: i64,

    /// Not before (as Unix timestamp).
    #[serde(default)]
    pub nbf: Option<i64>,

    /// Issued at (as Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,

    #[serde(default)]
    pub jti: Option<String>,

    /// Session id.
    #[serde(default)]
    pub sid: Option<String>,
}

impl SessionClaims {
    /// Shop domain named by `dest`.
    pub fn shop(&self) -> Option<String> {
        let url = reqwest::Url::parse(&self.dest).ok()?;
        url.host_str().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(dest: &str) -> SessionClaims {
        SessionClaims {
            iss: None,
            dest: dest.to_string(),
            aud: None,
            sub: None,
            exp: 0,
            nbf: None,
            iat: None,
            jti: None,
            sid: None,
        }
    }

    #[test]
    fn test_shop_from_dest() {
        assert_eq!(
            claims("https://academy.myshopify.com").shop().as_deref(),
            Some("academy.myshopify.com")
        );
        assert_eq!(
            claims("https://academy.myshopify.com/admin").shop().as_deref(),
            Some("academy.myshopify.com")
        );
        assert_eq!(claims("not a url").shop(), None);
    }
}
