//! Course catalog: listing and tree resolution.

use tracing::{debug, instrument};

use super::error::CatalogResult;
use super::models::{Course, CourseSummary, EntityKind, ScalarFields};
use super::schema::{ExpansionSchema, TREE_OPERATION};
use crate::shopify::{AdminClient, ShopSession};

/// Resolves courses from the shop's metaobjects.
#[derive(Clone)]
pub struct CourseCatalog {
    client: AdminClient,
    schema: ExpansionSchema,
    tree_query: String,
}

impl CourseCatalog {
    /// Catalog over the standard course → module → lesson curriculum.
    pub fn new(client: AdminClient) -> Self {
        let schema = ExpansionSchema::curriculum(client.pages().references);
        Self::with_schema(client, schema)
    }

    pub fn with_schema(client: AdminClient, schema: ExpansionSchema) -> Self {
        let tree_query = schema.tree_query(EntityKind::Course);
        Self {
            client,
            schema,
            tree_query,
        }
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    /// List all courses with their scalar fields.
    ///
    /// The modules reference is not expanded and is left out of the
    /// attribute bag.
    #[instrument(skip(self, session))]
    pub async fn list_courses(&self, session: &ShopSession) -> CatalogResult<Vec<CourseSummary>> {
        let child_field = self
            .schema
            .child_of(EntityKind::Course)
            .map(|rule| rule.field);

        let nodes = self
            .client
            .list_metaobjects(session, EntityKind::Course.metaobject_type())
            .await?;

        let courses: Vec<CourseSummary> = nodes
            .into_iter()
            .map(|node| {
                let mut scalars = ScalarFields::default();
                for field in &node.fields {
                    if Some(field.key.as_str()) == child_field {
                        continue;
                    }
                    scalars.insert(&field.key, field.value.as_deref().unwrap_or_default());
                }
                CourseSummary {
                    id: node.id,
                    handle: node.handle,
                    title: scalars.title,
                    description: scalars.description,
                    attributes: scalars.attributes,
                }
            })
            .collect();

        debug!(count = courses.len(), "Listed courses");
        Ok(courses)
    }

    /// Resolve a course and its full curriculum by handle.
    ///
    /// Returns `None` when no course has that handle.
    #[instrument(skip(self, session))]
    pub async fn course_by_handle(
        &self,
        session: &ShopSession,
        handle: &str,
    ) -> CatalogResult<Option<Course>> {
        let node = self
            .client
            .metaobject_by_handle(
                session,
                TREE_OPERATION,
                &self.tree_query,
                EntityKind::Course.metaobject_type(),
                handle,
            )
            .await?;

        match node {
            Some(node) => Ok(Some(self.schema.expand_course(&node)?)),
            None => {
                debug!(handle, "Course not found");
                Ok(None)
            }
        }
    }
}
