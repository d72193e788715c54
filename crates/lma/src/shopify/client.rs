//! Typed Admin API operations.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use super::config::PageSizes;
use super::error::{ShopifyError, ShopifyResult};
use super::queries;
use super::session::ShopSession;
use super::transport::GraphQlTransport;
use super::types::{
    Connection, CustomerId, CustomerNode, GraphQlRequest, GraphQlResponse, MetaobjectNode,
    MetaobjectRef, UserError,
};

/// Client for the Admin GraphQL API.
///
/// Holds no per-shop state; every call takes the session it runs under.
#[derive(Clone)]
pub struct AdminClient {
    transport: Arc<dyn GraphQlTransport>,
    namespace: String,
    pages: PageSizes,
}

impl AdminClient {
    /// Create a new client.
    pub fn new(
        transport: Arc<dyn GraphQlTransport>,
        namespace: impl Into<String>,
        pages: PageSizes,
    ) -> Self {
        Self {
            transport,
            namespace: namespace.into(),
            pages,
        }
    }

    /// Metafield namespace for LMS keys.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn pages(&self) -> &PageSizes {
        &self.pages
    }

    /// Execute a request and decode its `data` payload.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        session: &ShopSession,
        request: &GraphQlRequest,
    ) -> ShopifyResult<T> {
        let body = self.transport.execute(session, request).await?;
        let response: GraphQlResponse<T> = serde_json::from_value(body)
            .map_err(|e| ShopifyError::ParseError(format!("Failed to decode payload: {}", e)))?;

        if !response.errors.is_empty() {
            return Err(ShopifyError::GraphQl(
                response.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        response
            .data
            .ok_or_else(|| ShopifyError::ParseError("response has no data".to_string()))
    }

    /// List metaobjects of one type (fields only, references not expanded).
    #[instrument(skip(self, session))]
    pub async fn list_metaobjects(
        &self,
        session: &ShopSession,
        metaobject_type: &str,
    ) -> ShopifyResult<Vec<MetaobjectNode>> {
        #[derive(Deserialize)]
        struct Data {
            metaobjects: Connection<MetaobjectNode>,
        }

        let request = GraphQlRequest::new(
            "ListMetaobjects",
            queries::LIST_METAOBJECTS,
            json!({ "type": metaobject_type, "first": self.pages.courses }),
        );
        let data: Data = self.execute(session, &request).await?;
        Ok(data.metaobjects.into_nodes())
    }

    /// Fetch a metaobject by handle using a caller-built selection.
    ///
    /// The query must declare `$type` and `$handle` and select
    /// `metaobjectByHandle`.
    #[instrument(skip(self, session, query))]
    pub async fn metaobject_by_handle(
        &self,
        session: &ShopSession,
        operation_name: &str,
        query: &str,
        metaobject_type: &str,
        handle: &str,
    ) -> ShopifyResult<Option<MetaobjectNode>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            metaobject_by_handle: Option<MetaobjectNode>,
        }

        let request = GraphQlRequest::new(
            operation_name,
            query,
            json!({ "type": metaobject_type, "handle": handle }),
        );
        let data: Data = self.execute(session, &request).await?;
        Ok(data.metaobject_by_handle)
    }

    /// List customers with the metafields of the LMS namespace.
    #[instrument(skip(self, session))]
    pub async fn list_customers(&self, session: &ShopSession) -> ShopifyResult<Vec<CustomerNode>> {
        #[derive(Deserialize)]
        struct Data {
            customers: Connection<CustomerNode>,
        }

        let request = GraphQlRequest::new(
            "ListCustomers",
            queries::LIST_CUSTOMERS,
            json!({
                "first": self.pages.customers,
                "metafieldsFirst": self.pages.metafields,
                "namespace": self.namespace,
            }),
        );
        let data: Data = self.execute(session, &request).await?;
        Ok(data.customers.into_nodes())
    }

    /// Fetch one customer.
    #[instrument(skip(self, session), fields(customer = %id))]
    pub async fn customer(
        &self,
        session: &ShopSession,
        id: &CustomerId,
    ) -> ShopifyResult<Option<CustomerNode>> {
        #[derive(Deserialize)]
        struct Data {
            customer: Option<CustomerNode>,
        }

        let request = GraphQlRequest::new(
            "GetCustomer",
            queries::GET_CUSTOMER,
            json!({
                "id": id.gid(),
                "metafieldsFirst": self.pages.metafields,
                "namespace": self.namespace,
            }),
        );
        let data: Data = self.execute(session, &request).await?;
        Ok(data.customer)
    }

    /// Metaobjects referenced by a customer's list metafield.
    ///
    /// A missing customer or metafield yields an empty list.
    #[instrument(skip(self, session), fields(customer = %id))]
    pub async fn customer_references(
        &self,
        session: &ShopSession,
        id: &CustomerId,
        key: &str,
        first: u32,
    ) -> ShopifyResult<Vec<MetaobjectRef>> {
        #[derive(Deserialize)]
        struct Data {
            customer: Option<Customer>,
        }
        #[derive(Deserialize)]
        struct Customer {
            metafield: Option<Metafield>,
        }
        #[derive(Deserialize)]
        struct Metafield {
            references: Option<Connection<MetaobjectRef>>,
        }

        let request = GraphQlRequest::new(
            "CustomerMetafieldReferences",
            queries::CUSTOMER_METAFIELD_REFERENCES,
            json!({
                "id": id.gid(),
                "namespace": self.namespace,
                "key": key,
                "first": first,
            }),
        );
        let data: Data = self.execute(session, &request).await?;

        let refs: Vec<MetaobjectRef> = data
            .customer
            .and_then(|c| c.metafield)
            .and_then(|m| m.references)
            .map(Connection::into_nodes)
            .unwrap_or_default()
            .into_iter()
            .filter(|r| !r.id.is_empty())
            .collect();
        debug!(key, count = refs.len(), "Resolved customer references");
        Ok(refs)
    }

    /// Write a boolean metafield on a customer.
    #[instrument(skip(self, session), fields(customer = %id))]
    pub async fn set_customer_flag(
        &self,
        session: &ShopSession,
        id: &CustomerId,
        key: &str,
        value: bool,
    ) -> ShopifyResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            customer_update: Option<Payload>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            #[serde(default)]
            user_errors: Vec<UserError>,
        }

        let value = if value { "true" } else { "false" };
        let request = GraphQlRequest::new(
            "UpdateCustomerMetafield",
            queries::UPDATE_CUSTOMER_METAFIELD,
            json!({
                "input": {
                    "id": id.gid(),
                    "metafields": [{
                        "namespace": self.namespace,
                        "key": key,
                        "type": "boolean",
                        "value": value,
                    }],
                }
            }),
        );
        let data: Data = self.execute(session, &request).await?;

        let payload = data
            .customer_update
            .ok_or_else(|| ShopifyError::ParseError("customerUpdate returned null".to_string()))?;
        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(
                payload.user_errors.iter().map(ToString::to_string).collect(),
            ));
        }
        Ok(())
    }
}
