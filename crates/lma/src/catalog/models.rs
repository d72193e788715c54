//! Course tree types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Upstream scalar fields that have no declared slot.
pub type Attributes = BTreeMap<String, String>;

/// A course with its curriculum expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attributes: Attributes,
    pub modules: Vec<Module>,
}

impl Course {
    /// All lessons in curriculum order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }
}

/// A course as shown in listings: scalar fields only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attributes: Attributes,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attributes: Attributes,
    /// Set only when the tree is annotated for a student.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Metaobject kinds that make up a curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Course,
    Module,
    Lesson,
}

impl EntityKind {
    /// Metaobject definition type in the shop.
    pub fn metaobject_type(self) -> &'static str {
        match self {
            EntityKind::Course => "course",
            EntityKind::Module => "module",
            EntityKind::Lesson => "lesson",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metaobject_type())
    }
}

/// An expanded metaobject, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Course(Course),
    Module(Module),
    Lesson(Lesson),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Course(_) => EntityKind::Course,
            Entity::Module(_) => EntityKind::Module,
            Entity::Lesson(_) => EntityKind::Lesson,
        }
    }
}

/// Scalar fields split into declared slots and the attribute bag.
#[derive(Debug, Default)]
pub(crate) struct ScalarFields {
    pub title: String,
    pub description: String,
    pub attributes: Attributes,
}

impl ScalarFields {
    pub fn insert(&mut self, key: &str, value: &str) {
        match key {
            "title" => self.title = value.to_string(),
            "description" => self.description = value.to_string(),
            _ => {
                self.attributes.insert(key.to_string(), value.to_string());
            }
        }
    }
}
