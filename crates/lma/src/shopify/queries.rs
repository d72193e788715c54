//! Static GraphQL documents.
//!
//! The course tree query is generated by `catalog::schema` from the
//! expansion schema and is not listed here.

pub const LIST_METAOBJECTS: &str = r#"
query ListMetaobjects($type: String!, $first: Int!) {
  metaobjects(type: $type, first: $first) {
    edges {
      node {
        id
        handle
        type
        fields {
          key
          value
        }
      }
    }
  }
}
"#;

pub const LIST_CUSTOMERS: &str = r#"
query ListCustomers($first: Int!, $metafieldsFirst: Int!, $namespace: String!) {
  customers(first: $first) {
    edges {
      node {
        id
        firstName
        lastName
        email
        metafields(first: $metafieldsFirst, namespace: $namespace) {
          edges {
            node {
              key
              value
              namespace
            }
          }
        }
      }
    }
  }
}
"#;

pub const GET_CUSTOMER: &str = r#"
query GetCustomer($id: ID!, $metafieldsFirst: Int!, $namespace: String!) {
  customer(id: $id) {
    id
    firstName
    lastName
    email
    metafields(first: $metafieldsFirst, namespace: $namespace) {
      edges {
        node {
          key
          value
          namespace
        }
      }
    }
  }
}
"#;

pub const CUSTOMER_METAFIELD_REFERENCES: &str = r#"
query CustomerMetafieldReferences($id: ID!, $namespace: String!, $key: String!, $first: Int!) {
  customer(id: $id) {
    metafield(namespace: $namespace, key: $key) {
      references(first: $first) {
        edges {
          node {
            ... on Metaobject {
              id
              handle
            }
          }
        }
      }
    }
  }
}
"#;

pub const UPDATE_CUSTOMER_METAFIELD: &str = r#"
mutation UpdateCustomerMetafield($input: CustomerInput!) {
  customerUpdate(input: $input) {
    customer {
      id
    }
    userErrors {
      field
      message
    }
  }
}
"#;
