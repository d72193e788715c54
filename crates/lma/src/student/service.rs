//! Student directory service.

use thiserror::Error;
use tracing::{debug, instrument};

use super::models::Student;
use crate::onboarding::{ONBOARDED_KEY, OnboardingRepository};
use crate::shopify::{AdminClient, CustomerId, ShopSession, ShopifyError};

#[derive(Debug, Error)]
pub enum StudentError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] ShopifyError),

    #[error("failed to load onboarding submissions: {0:#}")]
    Persistence(#[source] anyhow::Error),
}

/// Customers joined with their onboarding state.
#[derive(Clone)]
pub struct StudentDirectory {
    client: AdminClient,
    submissions: OnboardingRepository,
}

impl StudentDirectory {
    pub fn new(client: AdminClient, submissions: OnboardingRepository) -> Self {
        Self {
            client,
            submissions,
        }
    }

    /// List students with their latest submission.
    #[instrument(skip(self, session))]
    pub async fn list(&self, session: &ShopSession) -> Result<Vec<Student>, StudentError> {
        let customers = self.client.list_customers(session).await?;
        let ids: Vec<Option<CustomerId>> =
            customers.iter().map(|c| CustomerId::parse(&c.id)).collect();
        let legacy: Vec<&str> = ids.iter().flatten().map(CustomerId::legacy).collect();

        let mut submissions = self
            .submissions
            .latest_for_customers(&legacy)
            .await
            .map_err(StudentError::Persistence)?;

        let students: Vec<Student> = customers
            .into_iter()
            .zip(&ids)
            .map(|(customer, id)| {
                let onboarding = id.as_ref().and_then(|id| submissions.remove(id.legacy()));
                Student::from_customer(customer, self.client.namespace(), ONBOARDED_KEY, onboarding)
            })
            .collect();

        debug!(count = students.len(), "Listed students");
        Ok(students)
    }

    /// Fetch one student, or `None` when the customer does not exist.
    #[instrument(skip(self, session), fields(customer = %id))]
    pub async fn get(
        &self,
        session: &ShopSession,
        id: &CustomerId,
    ) -> Result<Option<Student>, StudentError> {
        let Some(customer) = self.client.customer(session, id).await? else {
            return Ok(None);
        };
        let onboarding = self
            .submissions
            .latest_for_customer(id.legacy())
            .await
            .map_err(StudentError::Persistence)?;

        Ok(Some(Student::from_customer(
            customer,
            self.client.namespace(),
            ONBOARDED_KEY,
            onboarding,
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::db::Database;
    use crate::onboarding::NewSubmission;
    use crate::shopify::PageSizes;
    use crate::shopify::testing::ScriptedTransport;

    fn session() -> ShopSession {
        ShopSession::new("academy.myshopify.com", "shpat_test")
    }

    async fn directory(transport: ScriptedTransport) -> (StudentDirectory, OnboardingRepository) {
        let db = Database::in_memory().await.unwrap();
        let repo = OnboardingRepository::new(db.pool().clone());
        let client = AdminClient::new(Arc::new(transport), "custom", PageSizes::default());
        (StudentDirectory::new(client, repo.clone()), repo)
    }

    fn submission(customer_id: &str) -> NewSubmission {
        NewSubmission {
            customer_id: customer_id.into(),
            first_name: Some("Ada".into()),
            last_name: None,
            email: None,
            phone: None,
            location: None,
            preferred_start_date: None,
            preferred_instructor: None,
            lesson_package: None,
            goals: Some("Learn jazz".into()),
            experience_level: None,
            music_preferences: None,
            weekly_hours_available: None,
            equipment_access: None,
            additional_notes: String::new(),
            created_at: "2025-03-01T10:00:00+00:00".into(),
        }
    }

    #[tokio::test]
    async fn test_list_joins_latest_submission() {
        let (directory, repo) = directory(ScriptedTransport::new(|_| {
            Ok(json!({ "data": { "customers": { "edges": [
                { "node": { "id": "gid://shopify/Customer/42", "firstName": "Ada", "lastName": "Lovelace",
                    "metafields": { "edges": [
                        { "node": { "key": "completed_onboarding", "namespace": "custom", "value": "true" } }
                    ] } } },
                { "node": { "id": "gid://shopify/Customer/7", "firstName": "Alan",
                    "metafields": { "edges": [] } } }
            ] } } }))
        }))
        .await;
        repo.insert(&submission("42")).await.unwrap();

        let students = directory.list(&session()).await.unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "Ada Lovelace");
        assert!(students[0].onboarded);
        assert_eq!(
            students[0].onboarding.as_ref().and_then(|s| s.goals.as_deref()),
            Some("Learn jazz")
        );
        assert!(!students[1].onboarded);
        assert!(students[1].onboarding.is_none());
    }

    #[tokio::test]
    async fn test_get_joins_submission_for_gid_and_legacy_ids() {
        let (directory, repo) = directory(ScriptedTransport::new(|_| {
            Ok(json!({ "data": { "customer": {
                "id": "gid://shopify/Customer/42", "firstName": "Ada", "lastName": "Lovelace",
                "metafields": { "edges": [
                    { "node": { "key": "completed_onboarding", "namespace": "custom", "value": "true" } }
                ] }
            } } }))
        }))
        .await;
        repo.insert(&submission("42")).await.unwrap();

        for raw in ["42", "gid://shopify/Customer/42"] {
            let student = directory
                .get(&session(), &CustomerId::parse(raw).unwrap())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(student.id, "gid://shopify/Customer/42");
            assert!(student.onboarded);
            assert_eq!(
                student.onboarding.as_ref().and_then(|s| s.goals.as_deref()),
                Some("Learn jazz"),
                "{raw}"
            );
        }
    }

    #[tokio::test]
    async fn test_get_unknown_customer() {
        let (directory, _) = directory(ScriptedTransport::new(|_| {
            Ok(json!({ "data": { "customer": null } }))
        }))
        .await;

        let student = directory
            .get(&session(), &CustomerId::parse("99").unwrap())
            .await
            .unwrap();
        assert!(student.is_none());
    }
}
