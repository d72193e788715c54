//! Wire types for the Admin GraphQL API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of customer global ids.
const CUSTOMER_GID_PREFIX: &str = "gid://shopify/Customer/";

/// A GraphQL request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    /// Create a request for a named operation.
    pub fn new(
        operation_name: impl Into<String>,
        query: impl Into<String>,
        variables: serde_json::Value,
    ) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: Some(operation_name.into()),
        }
    }

    /// Read a string variable, mostly useful for fakes in tests.
    pub fn variable_str(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(|v| v.as_str())
    }
}

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single GraphQL error entry.
#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Relay-style connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

impl<T> Connection<T> {
    /// Iterate over nodes in upstream order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// Consume the connection, keeping upstream order.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

/// Connection edge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// A metaobject with its key/value fields.
///
/// Reference expansions (`... on Metaobject`) that hit a non-metaobject
/// resource come back as `{}`; every field is therefore defaulted and such
/// nodes are recognised by an empty id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetaobjectNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub fields: Vec<MetaobjectField>,
}

/// One key/value field of a metaobject.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetaobjectField {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub references: Option<Connection<MetaobjectNode>>,
}

impl MetaobjectField {
    /// Referenced metaobjects in upstream order, skipping non-metaobject nodes.
    pub fn referenced_nodes(&self) -> impl Iterator<Item = &MetaobjectNode> {
        self.references
            .iter()
            .flat_map(|connection| connection.nodes())
            .filter(|node| !node.id.is_empty())
    }
}

/// Minimal metaobject reference (id and handle only).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetaobjectRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub handle: String,
}

/// A customer with the metafields of one namespace.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerNode {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub metafields: Connection<MetafieldNode>,
}

impl CustomerNode {
    /// Value of a metafield, if present.
    pub fn metafield_value(&self, namespace: &str, key: &str) -> Option<&str> {
        self.metafields
            .nodes()
            .find(|m| m.key == key && m.namespace.as_deref().is_none_or(|ns| ns == namespace))
            .and_then(|m| m.value.as_deref())
    }
}

/// A metafield key/value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetafieldNode {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Mutation `userErrors` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Customer identifier.
///
/// Accepts either the numeric legacy id (`"6241"`) or the global id
/// (`"gid://shopify/Customer/6241"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    /// Parse a customer id, rejecting blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let legacy = trimmed.strip_prefix(CUSTOMER_GID_PREFIX).unwrap_or(trimmed);
        if legacy.is_empty() || legacy.contains('/') {
            return None;
        }
        Some(Self(legacy.to_string()))
    }

    /// Global id used by the Admin API.
    pub fn gid(&self) -> String {
        format!("{CUSTOMER_GID_PREFIX}{}", self.0)
    }

    /// Legacy id used as the local store key.
    pub fn legacy(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
