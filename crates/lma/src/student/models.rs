//! Student data models.

use serde::Serialize;

use crate::onboarding::OnboardingSubmission;
use crate::shopify::CustomerNode;

/// A customer enrolled with the academy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub onboarded: bool,
    pub onboarding: Option<OnboardingSubmission>,
}

impl Student {
    /// Build a student from a customer node.
    ///
    /// `onboarded` holds only when the flag metafield is exactly `"true"`.
    pub fn from_customer(
        customer: CustomerNode,
        namespace: &str,
        onboarded_key: &str,
        onboarding: Option<OnboardingSubmission>,
    ) -> Self {
        let onboarded = customer.metafield_value(namespace, onboarded_key) == Some("true");
        let name = format!(
            "{} {}",
            customer.first_name.as_deref().unwrap_or_default(),
            customer.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string();

        Self {
            id: customer.id,
            name,
            email: customer.email,
            onboarded,
            onboarding,
        }
    }
}
