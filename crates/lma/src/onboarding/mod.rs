//! Onboarding intake module.
//!
//! Stores intake forms in SQLite and marks the customer as onboarded
//! upstream.

mod models;
mod repository;
mod service;

pub use models::{
    MusicPreferences, NewSubmission, OnboardingRequest, OnboardingSubmission, SubmissionReceipt,
};
pub use repository::OnboardingRepository;
pub use service::{ONBOARDED_KEY, OnboardingError, OnboardingService};
