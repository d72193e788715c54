//! GraphQL transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use super::config::ShopifyConfig;
use super::error::{ShopifyError, ShopifyResult};
use super::session::ShopSession;
use super::types::GraphQlRequest;

/// Sends a GraphQL request on behalf of a shop and returns the raw JSON body.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(
        &self,
        session: &ShopSession,
        request: &GraphQlRequest,
    ) -> ShopifyResult<serde_json::Value>;
}

/// Transport posting to the Admin GraphQL endpoint over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client.
    client: Client,
    /// Admin API version segment.
    api_version: String,
    /// Origin override; `https://{shop}` when unset.
    base_url: Option<String>,
}

impl HttpTransport {
    /// Create a new transport from configuration.
    pub fn new(config: &ShopifyConfig) -> ShopifyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_version: config.api_version.clone(),
            base_url: config
                .admin_base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    /// GraphQL endpoint for a shop.
    pub fn endpoint(&self, shop: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/admin/api/{}/graphql.json", base, self.api_version),
            None => format!("https://{}/admin/api/{}/graphql.json", shop, self.api_version),
        }
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    #[instrument(skip(self, request), fields(shop = %session.shop(), operation = ?request.operation_name))]
    async fn execute(
        &self,
        session: &ShopSession,
        request: &GraphQlRequest,
    ) -> ShopifyResult<serde_json::Value> {
        let url = self.endpoint(session.shop());
        let response = self
            .client
            .post(&url)
            .header("X-Shopify-Access-Token", session.access_token())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Admin API responded");

        match status {
            s if s.is_success() => response
                .json()
                .await
                .map_err(|e| ShopifyError::ParseError(format!("Failed to parse response: {}", e))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ShopifyError::Unauthorized {
                shop: session.shop().to_string(),
            }),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ShopifyError::Http {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
