//! Session middleware.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::{debug, warn};

use super::{AuthConfig, AuthError, SessionClaims, proxy};
use crate::shopify::{ShopSession, ShopifyConfig};

/// Extract a Bearer token from an Authorization header value.
fn bearer_token_from_header(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }

    let token = parts.next().ok_or(AuthError::InvalidAuthHeader)?;
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    if parts.next().is_some() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Authentication state shared across handlers.
#[derive(Clone)]
pub struct AuthState {
    config: Arc<AuthConfig>,
    api_key: Option<String>,
    api_secret: Option<Arc<str>>,
    decoding_key: Option<DecodingKey>,
    sessions: Arc<HashMap<String, ShopSession>>,
    default_shop: Option<String>,
}

impl AuthState {
    /// Create auth state from config.
    ///
    /// Secrets in `shopify` must already be resolved. The configured shop and
    /// access token form the only known session.
    pub fn new(config: AuthConfig, shopify: &ShopifyConfig) -> Self {
        let decoding_key = shopify
            .api_secret
            .as_ref()
            .map(|s| DecodingKey::from_secret(s.as_bytes()));

        let mut sessions = HashMap::new();
        if let (Some(shop), Some(token)) = (&shopify.shop, &shopify.access_token) {
            sessions.insert(shop.clone(), ShopSession::new(shop.clone(), token.clone()));
        }

        Self {
            config: Arc::new(config),
            api_key: shopify.api_key.clone(),
            api_secret: shopify.api_secret.as_deref().map(Arc::from),
            decoding_key,
            sessions: Arc::new(sessions),
            default_shop: shopify.shop.clone(),
        }
    }

    /// Check if dev mode is enabled.
    pub fn is_dev_mode(&self) -> bool {
        self.config.dev_mode
    }

    /// Get allowed CORS origins from config.
    pub fn allowed_origins(&self) -> &[String] {
        &self.config.allowed_origins
    }

    pub(crate) fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    /// Stored session for a shop domain.
    pub fn session_for_shop(&self, shop: &str) -> Result<ShopSession, AuthError> {
        self.sessions
            .get(shop)
            .cloned()
            .ok_or_else(|| AuthError::UnknownShop(shop.to_string()))
    }

    /// Session of the configured shop, used in dev mode.
    pub fn default_session(&self) -> Result<ShopSession, AuthError> {
        let shop = self
            .default_shop
            .as_deref()
            .ok_or_else(|| AuthError::Internal("no shop configured".to_string()))?;
        self.session_for_shop(shop)
    }

    /// Validate an admin session token.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let decoding_key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| AuthError::InvalidToken("no API secret configured".to_string()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        match &self.api_key {
            Some(api_key) => validation.set_audience(&[api_key]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<SessionClaims>(token, decoding_key, &validation).map_err(|e| {
            warn!("Session token validation failed: {:?}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Upstream session of the current request.
#[derive(Debug, Clone)]
pub struct CurrentShop(pub ShopSession);

impl CurrentShop {
    pub fn session(&self) -> &ShopSession {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentShop
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentShop>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Session token middleware for admin routes.
///
/// Validates the `Authorization: Bearer` session token and injects
/// `CurrentShop`. In dev mode a request without a token, or any request
/// when no API secret is configured, runs under the configured shop.
pub async fn session_middleware(
    State(auth): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let session = if auth.is_dev_mode() && (auth_header.is_none() || auth.decoding_key.is_none()) {
        debug!("Dev mode, using configured shop");
        auth.default_session()?
    } else if let Some(header) = auth_header {
        let token = bearer_token_from_header(header)?;
        let claims = auth.validate_token(token)?;
        let shop = claims
            .shop()
            .ok_or_else(|| AuthError::InvalidToken("dest is not a shop URL".to_string()))?;
        auth.session_for_shop(&shop)?
    } else {
        return Err(AuthError::MissingAuthHeader);
    };

    req.extensions_mut().insert(CurrentShop(session));

    Ok(next.run(req).await)
}

/// App proxy middleware for storefront routes.
///
/// Verifies the `signature` query parameter and injects the session of the
/// `shop` parameter.
pub async fn proxy_middleware(
    State(auth): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let query = req.uri().query().unwrap_or_default().to_string();
    let params = proxy::parse_query(&query);

    match auth.api_secret() {
        Some(secret) => proxy::verify(secret, &params)?,
        None if auth.is_dev_mode() => debug!("No API secret, skipping proxy signature check"),
        None => return Err(AuthError::Internal("no API secret configured".to_string())),
    }

    let session = match params.get("shop").and_then(|values| values.first()) {
        Some(shop) => auth.session_for_shop(shop)?,
        None if auth.is_dev_mode() => auth.default_session()?,
        None => return Err(AuthError::UnknownShop(String::new())),
    };

    req.extensions_mut().insert(CurrentShop(session));

    Ok(next.run(req).await)
}
