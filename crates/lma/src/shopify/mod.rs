//! Shopify Admin API client module.
//!
//! Provides the GraphQL transport, typed query wrappers and the per-request
//! shop session used to authorize upstream calls.

mod client;
mod config;
mod error;
mod queries;
mod session;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::AdminClient;
pub use config::{PageSizes, ShopifyConfig};
pub use error::{ShopifyError, ShopifyResult};
pub use session::ShopSession;
pub use transport::{GraphQlTransport, HttpTransport};
pub use types::*;
