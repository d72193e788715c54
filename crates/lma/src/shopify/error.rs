//! Admin API client error types.

use thiserror::Error;

/// Result type for Admin API operations.
pub type ShopifyResult<T> = Result<T, ShopifyError>;

/// Errors that can occur while talking to the Admin GraphQL API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The access token was rejected by the shop.
    #[error("Unauthorized: access token rejected by {shop}")]
    Unauthorized { shop: String },

    /// Non-success HTTP status other than an auth failure.
    #[error("Admin API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The query executed but GraphQL reported errors.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// A mutation returned `userErrors`.
    #[error("Mutation rejected: {}", .0.join("; "))]
    UserErrors(Vec<String>),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ShopifyError {
    /// Whether the failure means the upstream session is not usable.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
