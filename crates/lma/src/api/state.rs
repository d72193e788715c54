//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::AuthState;
use crate::catalog::CourseCatalog;
use crate::db::Database;
use crate::onboarding::{OnboardingRepository, OnboardingService};
use crate::progress::ProgressService;
use crate::shopify::AdminClient;
use crate::student::StudentDirectory;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Course listing and tree resolution.
    pub catalog: Arc<CourseCatalog>,
    /// Student progress aggregation.
    pub progress: Arc<ProgressService>,
    /// Customer listing joined with onboarding data.
    pub students: Arc<StudentDirectory>,
    /// Onboarding submission and flag updates.
    pub onboarding: Arc<OnboardingService>,
    /// Authentication state.
    pub auth: AuthState,
}

impl AppState {
    /// Wire the services over one Admin API client and database.
    pub fn new(client: AdminClient, db: &Database, auth: AuthState) -> Self {
        let catalog = CourseCatalog::new(client.clone());
        let submissions = OnboardingRepository::new(db.pool().clone());

        Self {
            progress: Arc::new(ProgressService::new(catalog.clone())),
            catalog: Arc::new(catalog),
            students: Arc::new(StudentDirectory::new(client.clone(), submissions.clone())),
            onboarding: Arc::new(OnboardingService::new(submissions, client)),
            auth,
        }
    }
}
