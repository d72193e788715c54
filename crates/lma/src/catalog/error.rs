//! Course catalog errors.

use thiserror::Error;

use super::models::EntityKind;
use crate::shopify::ShopifyError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] ShopifyError),

    /// A reference field held a metaobject of a kind the parent cannot own.
    #[error("{parent} cannot contain a {found}")]
    UnexpectedKind {
        parent: EntityKind,
        found: EntityKind,
    },

    /// A reference field points at a metaobject of another definition type.
    #[error("{field} of {handle} references a `{found}` metaobject, expected `{expected}`")]
    UnexpectedType {
        handle: String,
        field: &'static str,
        expected: EntityKind,
        found: String,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
