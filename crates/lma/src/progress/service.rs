//! Student progress aggregation.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::catalog::{CatalogError, Course, CourseCatalog};
use crate::shopify::{CustomerId, ShopSession, ShopifyError};

/// Customer metafield listing the registered course metaobjects.
pub const REGISTERED_COURSES_KEY: &str = "registered_courses";

/// Customer metafield listing the completed lesson metaobjects.
pub const COMPLETED_LESSONS_KEY: &str = "completed_lessons";

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] ShopifyError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A registered course handle does not resolve to a course.
    #[error("registered course not found: {0}")]
    MissingCourse(String),
}

pub type ProgressResult<T> = Result<T, ProgressError>;

/// Registered courses annotated with lesson completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProgress {
    pub courses: Vec<Course>,
}

/// Merges a student's registrations and completions into course trees.
#[derive(Clone)]
pub struct ProgressService {
    catalog: CourseCatalog,
}

impl ProgressService {
    pub fn new(catalog: CourseCatalog) -> Self {
        Self { catalog }
    }

    /// Registered courses for a student, in registration order.
    ///
    /// Fails as a whole if any registered course cannot be resolved.
    #[instrument(skip(self, session), fields(customer = %customer))]
    pub async fn student_progress(
        &self,
        session: &ShopSession,
        customer: &CustomerId,
    ) -> ProgressResult<StudentProgress> {
        let client = self.catalog.client();
        let pages = client.pages();

        let (registered, completed) = tokio::try_join!(
            client.customer_references(
                session,
                customer,
                REGISTERED_COURSES_KEY,
                pages.registered_courses,
            ),
            client.customer_references(
                session,
                customer,
                COMPLETED_LESSONS_KEY,
                pages.completed_lessons,
            ),
        )?;

        let completed: HashSet<String> = completed.into_iter().map(|r| r.id).collect();
        debug!(
            registered = registered.len(),
            completed = completed.len(),
            "Loaded registrations"
        );

        let mut courses = Vec::with_capacity(registered.len());
        for reference in registered {
            let mut course = self
                .catalog
                .course_by_handle(session, &reference.handle)
                .await?
                .ok_or_else(|| ProgressError::MissingCourse(reference.handle.clone()))?;
            mark_completion(&mut course, &completed);
            courses.push(course);
        }

        Ok(StudentProgress { courses })
    }
}

/// Set every lesson's `completed` flag from the completed id set.
pub fn mark_completion(course: &mut Course, completed: &HashSet<String>) {
    for module in &mut course.modules {
        for lesson in &mut module.lessons {
            lesson.completed = Some(completed.contains(&lesson.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use super::*;
    use crate::shopify::testing::ScriptedTransport;
    use crate::shopify::{AdminClient, PageSizes};

    fn session() -> ShopSession {
        ShopSession::new("academy.myshopify.com", "shpat_test")
    }

    fn refs(items: &[(&str, &str)]) -> Value {
        let edges: Vec<Value> = items
            .iter()
            .map(|(id, handle)| json!({ "node": { "id": id, "handle": handle } }))
            .collect();
        json!({ "data": { "customer": { "metafield": { "references": { "edges": edges } } } } })
    }

    fn course_tree(handle: &str, lesson_ids: &[&str]) -> Value {
        let lessons: Vec<Value> = lesson_ids
            .iter()
            .map(|id| {
                json!({ "node": { "id": id, "handle": id, "type": "lesson", "fields": [
                    { "key": "title", "value": format!("Lesson {id}") }
                ] } })
            })
            .collect();
        json!({ "data": { "metaobjectByHandle": {
            "id": format!("course-{handle}"),
            "handle": handle,
            "type": "course",
            "fields": [
                { "key": "title", "value": handle },
                { "key": "modules", "value": "[]", "references": { "edges": [
                    { "node": { "id": format!("module-{handle}"), "handle": "m", "type": "module", "fields": [
                        { "key": "title", "value": "Module" },
                        { "key": "lessons", "value": "[]", "references": { "edges": lessons } }
                    ] } }
                ] } }
            ]
        } } })
    }

    fn service(transport: ScriptedTransport) -> (ProgressService, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let client = AdminClient::new(transport.clone(), "custom", PageSizes::default());
        (ProgressService::new(CourseCatalog::new(client)), transport)
    }

    fn scenario(request: &crate::shopify::GraphQlRequest) -> crate::shopify::ShopifyResult<Value> {
        match request.variable_str("key") {
            Some(REGISTERED_COURSES_KEY) => Ok(refs(&[("c1", "guitar-101"), ("c2", "piano-201")])),
            Some(COMPLETED_LESSONS_KEY) => Ok(refs(&[("lesson-7", "chords")])),
            _ => match request.variable_str("handle") {
                Some("guitar-101") => Ok(course_tree("guitar-101", &["lesson-1", "lesson-7"])),
                Some("piano-201") => Ok(course_tree("piano-201", &["lesson-20", "lesson-21"])),
                _ => Ok(json!({ "data": { "metaobjectByHandle": null } })),
            },
        }
    }

    #[tokio::test]
    async fn test_completion_follows_completed_set() {
        let (service, transport) = service(ScriptedTransport::new(scenario));
        let customer = CustomerId::parse("42").unwrap();

        let progress = service.student_progress(&session(), &customer).await.unwrap();

        let handles: Vec<_> = progress.courses.iter().map(|c| c.handle.as_str()).collect();
        assert_eq!(handles, vec!["guitar-101", "piano-201"]);

        let guitar: Vec<_> = progress.courses[0]
            .lessons()
            .map(|l| (l.id.as_str(), l.completed))
            .collect();
        assert_eq!(
            guitar,
            vec![("lesson-1", Some(false)), ("lesson-7", Some(true))]
        );
        assert!(progress.courses[1].lessons().all(|l| l.completed == Some(false)));

        let requests = transport.requests();
        let completed_request = requests
            .iter()
            .find(|r| r.variable_str("key") == Some(COMPLETED_LESSONS_KEY))
            .unwrap();
        assert_eq!(completed_request.variables["first"], 100);
    }

    #[tokio::test]
    async fn test_no_registrations_is_empty() {
        let (service, _) = service(ScriptedTransport::new(|_| {
            Ok(json!({ "data": { "customer": null } }))
        }));
        let customer = CustomerId::parse("42").unwrap();

        let progress = service.student_progress(&session(), &customer).await.unwrap();
        assert!(progress.courses.is_empty());
    }

    #[tokio::test]
    async fn test_missing_course_fails_whole_request() {
        let (service, _) = service(ScriptedTransport::new(|request| {
            match request.variable_str("key") {
                Some(REGISTERED_COURSES_KEY) => Ok(refs(&[("c1", "guitar-101"), ("c9", "retired")])),
                Some(_) => Ok(refs(&[])),
                None => scenario(request),
            }
        }));
        let customer = CustomerId::parse("42").unwrap();

        let err = service
            .student_progress(&session(), &customer)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::MissingCourse(ref handle) if handle == "retired"));
    }

    #[test]
    fn test_mark_completion_is_recomputed() {
        let mut course = crate::catalog::ExpansionSchema::curriculum(50)
            .expand_course(&crate::catalog::fixtures::course(
                "c1",
                "guitar-101",
                "Guitar 101",
                vec![crate::catalog::fixtures::module(
                    "m1",
                    "Basics",
                    vec![crate::catalog::fixtures::lesson("lesson-1", "Tuning")],
                )],
            ))
            .unwrap();

        mark_completion(&mut course, &HashSet::from(["lesson-1".to_string()]));
        assert_eq!(course.modules[0].lessons[0].completed, Some(true));

        mark_completion(&mut course, &HashSet::new());
        assert_eq!(course.modules[0].lessons[0].completed, Some(false));
    }
}
