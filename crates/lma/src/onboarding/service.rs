//! Onboarding submission service.

use thiserror::Error;
use tracing::{info, instrument, warn};

use super::models::{NewSubmission, OnboardingRequest, SubmissionReceipt};
use super::repository::OnboardingRepository;
use crate::shopify::{AdminClient, CustomerId, ShopSession, ShopifyError};

/// Customer metafield marking a completed onboarding.
pub const ONBOARDED_KEY: &str = "completed_onboarding";

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("customerId is required")]
    MissingCustomerId,

    #[error("failed to store onboarding submission: {0:#}")]
    Persistence(#[source] anyhow::Error),

    /// The submission was stored but the onboarded flag was not set.
    #[error("submission {submission_id} stored but onboarded flag update failed: {source}")]
    FlagUpdate {
        submission_id: i64,
        #[source]
        source: ShopifyError,
    },
}

/// Stores intake forms and flags customers as onboarded.
#[derive(Clone)]
pub struct OnboardingService {
    repo: OnboardingRepository,
    client: AdminClient,
}

impl OnboardingService {
    pub fn new(repo: OnboardingRepository, client: AdminClient) -> Self {
        Self { repo, client }
    }

    /// Store a submission, then set the customer's onboarded flag.
    ///
    /// Nothing is written when the customer id is missing. A flag failure
    /// after the insert is reported with the stored submission id.
    #[instrument(skip(self, session, request))]
    pub async fn submit(
        &self,
        session: &ShopSession,
        request: OnboardingRequest,
    ) -> Result<SubmissionReceipt, OnboardingError> {
        let customer = request
            .customer_id
            .as_deref()
            .and_then(CustomerId::parse)
            .ok_or(OnboardingError::MissingCustomerId)?;

        let row = NewSubmission::from_request(
            customer.legacy().to_string(),
            request,
            chrono::Utc::now().to_rfc3339(),
        );
        let submission_id = self
            .repo
            .insert(&row)
            .await
            .map_err(OnboardingError::Persistence)?;

        if let Err(source) = self
            .client
            .set_customer_flag(session, &customer, ONBOARDED_KEY, true)
            .await
        {
            warn!(submission_id, customer = %customer, "Onboarded flag update failed");
            return Err(OnboardingError::FlagUpdate {
                submission_id,
                source,
            });
        }

        info!(submission_id, customer = %customer, "Onboarding submitted");
        Ok(SubmissionReceipt {
            message: "Onboarding submission stored".to_string(),
            submission_id,
            customer_id: customer.legacy().to_string(),
        })
    }

    /// Set the onboarded flag only, e.g. after a partially failed submit.
    #[instrument(skip(self, session), fields(customer = %customer))]
    pub async fn mark_onboarded(
        &self,
        session: &ShopSession,
        customer: &CustomerId,
    ) -> Result<(), ShopifyError> {
        self.client
            .set_customer_flag(session, customer, ONBOARDED_KEY, true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::db::Database;
    use crate::shopify::testing::ScriptedTransport;
    use crate::shopify::PageSizes;

    async fn service(
        transport: ScriptedTransport,
    ) -> (OnboardingService, OnboardingRepository, Arc<ScriptedTransport>) {
        let db = Database::in_memory().await.unwrap();
        let repo = OnboardingRepository::new(db.pool().clone());
        let transport = Arc::new(transport);
        let client = AdminClient::new(transport.clone(), "custom", PageSizes::default());
        (OnboardingService::new(repo.clone(), client), repo, transport)
    }

    fn session() -> ShopSession {
        ShopSession::new("academy.myshopify.com", "shpat_test")
    }

    fn flag_ok() -> ScriptedTransport {
        ScriptedTransport::new(|_| {
            Ok(json!({ "data": { "customerUpdate": { "userErrors": [] } } }))
        })
    }

    fn request(customer_id: Option<&str>) -> OnboardingRequest {
        OnboardingRequest {
            customer_id: customer_id.map(str::to_string),
            first_name: Some("Ada".into()),
            goals: Some("Play chords".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_submit_stores_and_flags() {
        let (service, repo, transport) = service(flag_ok()).await;

        let receipt = service
            .submit(&session(), request(Some("gid://shopify/Customer/42")))
            .await
            .unwrap();

        assert_eq!(receipt.customer_id, "42");
        let stored = repo
            .latest_for_customer("42")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, receipt.submission_id);
        assert_eq!(stored.first_name.as_deref(), Some("Ada"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].variables["input"]["metafields"][0]["key"],
            ONBOARDED_KEY
        );
    }

    #[tokio::test]
    async fn test_missing_customer_id_has_no_side_effects() {
        let (service, repo, transport) = service(flag_ok()).await;

        for id in [None, Some(""), Some("   ")] {
            let err = service.submit(&session(), request(id)).await.unwrap_err();
            assert!(matches!(err, OnboardingError::MissingCustomerId));
        }

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_flag_failure_reports_stored_submission() {
        let (service, repo, _) = service(ScriptedTransport::new(|_| {
            Ok(json!({ "data": { "customerUpdate": {
                "userErrors": [{ "field": ["id"], "message": "Customer does not exist" }]
            } } }))
        }))
        .await;

        let err = service
            .submit(&session(), request(Some("42")))
            .await
            .unwrap_err();

        let OnboardingError::FlagUpdate { submission_id, .. } = err else {
            panic!("expected a flag update failure, got {err:?}");
        };
        assert_eq!(repo.count().await.unwrap(), 1);
        let stored = repo
            .latest_for_customer("42")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, submission_id);
    }

    #[tokio::test]
    async fn test_mark_onboarded_only_updates_flag() {
        let (service, repo, transport) = service(flag_ok()).await;

        service
            .mark_onboarded(&session(), &CustomerId::parse("42").unwrap())
            .await
            .unwrap();

        assert_eq!(transport.requests().len(), 1);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
