//! Expansion schema: which reference field of each kind holds its children.
//!
//! The same table drives both the generated GraphQL selection and the
//! recursive expansion of the response, so the two always nest to the same
//! depth.

use std::fmt::Write;

use tracing::debug;

use super::error::{CatalogError, CatalogResult};
use super::models::{Course, Entity, EntityKind, Lesson, Module, ScalarFields};
use crate::shopify::MetaobjectNode;

/// Operation name of the generated tree query.
pub const TREE_OPERATION: &str = "GetMetaobjectTree";

/// Depth of the course → module → lesson curriculum.
pub const CURRICULUM_DEPTH: usize = 2;

/// A reference field linking a parent kind to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildField {
    pub parent: EntityKind,
    pub field: &'static str,
    pub child: EntityKind,
}

/// Kind-to-child-field table with an explicit depth limit.
#[derive(Debug, Clone)]
pub struct ExpansionSchema {
    children: Vec<ChildField>,
    max_depth: usize,
    page_size: u32,
}

impl ExpansionSchema {
    pub fn new(children: Vec<ChildField>, max_depth: usize, page_size: u32) -> Self {
        Self {
            children,
            max_depth,
            page_size,
        }
    }

    /// `course.modules → module`, `module.lessons → lesson`.
    pub fn curriculum(page_size: u32) -> Self {
        Self::new(
            vec![
                ChildField {
                    parent: EntityKind::Course,
                    field: "modules",
                    child: EntityKind::Module,
                },
                ChildField {
                    parent: EntityKind::Module,
                    field: "lessons",
                    child: EntityKind::Lesson,
                },
            ],
            CURRICULUM_DEPTH,
            page_size,
        )
    }

    pub fn child_of(&self, kind: EntityKind) -> Option<&ChildField> {
        self.children.iter().find(|c| c.parent == kind)
    }

    /// Build the `metaobjectByHandle` query for a root kind.
    ///
    /// Variables: `$type`, `$handle`.
    pub fn tree_query(&self, root: EntityKind) -> String {
        let mut selection = String::new();
        self.write_selection(&mut selection, root, 0, 2);

        let mut query = String::new();
        let _ = writeln!(
            query,
            "query {TREE_OPERATION}($type: String!, $handle: String!) {{"
        );
        let _ = writeln!(
            query,
            "  metaobjectByHandle(handle: {{ type: $type, handle: $handle }}) {{"
        );
        query.push_str(&selection);
        query.push_str("  }\n}\n");
        query
    }

    fn write_selection(&self, out: &mut String, kind: EntityKind, depth: usize, indent: usize) {
        let pad = "  ".repeat(indent);
        let _ = writeln!(out, "{pad}id\n{pad}handle\n{pad}type\n{pad}fields {{");
        let _ = writeln!(out, "{pad}  key\n{pad}  value");

        if let Some(child) = self.child_of(kind).filter(|_| depth < self.max_depth) {
            let _ = writeln!(out, "{pad}  references(first: {}) {{", self.page_size);
            let _ = writeln!(out, "{pad}    edges {{\n{pad}      node {{");
            let _ = writeln!(out, "{pad}        ... on Metaobject {{");
            self.write_selection(out, child.child, depth + 1, indent + 5);
            let _ = writeln!(out, "{pad}        }}\n{pad}      }}\n{pad}    }}\n{pad}  }}");
        }

        let _ = writeln!(out, "{pad}}}");
    }

    /// Expand a fetched metaobject into a typed entity.
    ///
    /// Fields other than the kind's child field are copied as scalars. The
    /// child field is expanded recursively in upstream order; a missing or
    /// null reference list yields no children.
    pub fn expand(&self, node: &MetaobjectNode, kind: EntityKind) -> CatalogResult<Entity> {
        self.expand_at(node, kind, 0)
    }

    /// Expand a node known to be a course.
    pub fn expand_course(&self, node: &MetaobjectNode) -> CatalogResult<Course> {
        match self.expand(node, EntityKind::Course)? {
            Entity::Course(course) => Ok(course),
            other => Err(CatalogError::UnexpectedKind {
                parent: EntityKind::Course,
                found: other.kind(),
            }),
        }
    }

    fn expand_at(
        &self,
        node: &MetaobjectNode,
        kind: EntityKind,
        depth: usize,
    ) -> CatalogResult<Entity> {
        let child_field = self.child_of(kind);
        let mut scalars = ScalarFields::default();
        let mut children = Vec::new();

        for field in &node.fields {
            match child_field {
                Some(rule) if rule.field == field.key => {
                    if depth >= self.max_depth {
                        debug!(handle = %node.handle, field = rule.field, "Depth limit reached");
                        continue;
                    }
                    for child in field.referenced_nodes() {
                        check_type(node, rule, child)?;
                        children.push(self.expand_at(child, rule.child, depth + 1)?);
                    }
                }
                _ => scalars.insert(&field.key, field.value.as_deref().unwrap_or_default()),
            }
        }

        let id = node.id.clone();
        let handle = node.handle.clone();
        let entity = match kind {
            EntityKind::Course => Entity::Course(Course {
                id,
                handle,
                title: scalars.title,
                description: scalars.description,
                attributes: scalars.attributes,
                modules: typed_children(kind, children, |e| match e {
                    Entity::Module(m) => Ok(m),
                    other => Err(other),
                })?,
            }),
            EntityKind::Module => Entity::Module(Module {
                id,
                handle,
                title: scalars.title,
                description: scalars.description,
                attributes: scalars.attributes,
                lessons: typed_children(kind, children, |e| match e {
                    Entity::Lesson(l) => Ok(l),
                    other => Err(other),
                })?,
            }),
            EntityKind::Lesson => {
                if let Some(first) = children.first() {
                    return Err(CatalogError::UnexpectedKind {
                        parent: kind,
                        found: first.kind(),
                    });
                }
                Entity::Lesson(Lesson {
                    id,
                    handle,
                    title: scalars.title,
                    description: scalars.description,
                    attributes: scalars.attributes,
                    completed: None,
                })
            }
        };

        Ok(entity)
    }
}

/// Reject a child whose upstream `type` is not the kind the field holds.
/// Nodes fetched without their type are trusted.
fn check_type(parent: &MetaobjectNode, rule: &ChildField, child: &MetaobjectNode) -> CatalogResult<()> {
    match child.kind.as_deref() {
        Some(found) if found != rule.child.metaobject_type() => Err(CatalogError::UnexpectedType {
            handle: parent.handle.clone(),
            field: rule.field,
            expected: rule.child,
            found: found.to_string(),
        }),
        _ => Ok(()),
    }
}

fn typed_children<T>(
    parent: EntityKind,
    children: Vec<Entity>,
    pick: impl Fn(Entity) -> Result<T, Entity>,
) -> CatalogResult<Vec<T>> {
    children
        .into_iter()
        .map(|child| {
            pick(child).map_err(|other| CatalogError::UnexpectedKind {
                parent,
                found: other.kind(),
            })
        })
        .collect()
}
