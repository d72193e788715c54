//! Authentication module.
//!
//! Resolves the upstream shop session of each request:
//! - Admin session tokens (HS256 JWT signed with the app secret)
//! - App proxy signatures for storefront routes
//! - Dev bypass mode using the configured shop

mod claims;
mod config;
mod error;
mod middleware;
pub mod proxy;

pub use claims::SessionClaims;
pub use config::{AuthConfig, ConfigValidationError, resolve_secret};
pub use error::AuthError;
pub use middleware::{AuthState, CurrentShop, proxy_middleware, session_middleware};
