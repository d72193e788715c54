//! Course catalog module.
//!
//! Courses, modules and lessons are shop metaobjects linked by list
//! reference fields. This module lists courses and resolves a course into
//! its full curriculum tree.

mod error;
mod models;
mod schema;
mod service;

#[cfg(test)]
pub(crate) use schema::fixtures;

pub use error::{CatalogError, CatalogResult};
pub use models::{Attributes, Course, CourseSummary, Entity, EntityKind, Lesson, Module};
pub use schema::{ChildField, ExpansionSchema};
pub use service::CourseCatalog;
