//! Onboarding data models.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Music preferences as sent by the intake form: a list or free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MusicPreferences {
    List(Vec<String>),
    Text(String),
}

impl MusicPreferences {
    /// Stored form: list entries joined with ", ".
    pub fn to_stored(&self) -> String {
        match self {
            MusicPreferences::List(items) => items.join(", "),
            MusicPreferences::Text(text) => text.clone(),
        }
    }
}

/// Intake form body of `POST /submit-onboarding`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub customer_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "studentLoc")]
    pub location: Option<String>,
    #[serde(rename = "prefStartDate")]
    pub preferred_start_date: Option<String>,
    #[serde(rename = "prefInstructor")]
    pub preferred_instructor: Option<String>,
    pub lesson_package: Option<String>,
    pub goals: Option<String>,
    #[serde(rename = "expLevel")]
    pub experience_level: Option<String>,
    pub music_preferences: Option<MusicPreferences>,
    #[serde(rename = "hoursAvail", default, deserialize_with = "text_or_number")]
    pub weekly_hours_available: Option<String>,
    pub equipment_access: Option<String>,
    #[serde(rename = "otherNotes")]
    pub additional_notes: Option<String>,
}

/// Accept a JSON string or number, keeping its text form.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

/// Row to insert, keyed by the legacy customer id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub customer_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub preferred_start_date: Option<String>,
    pub preferred_instructor: Option<String>,
    pub lesson_package: Option<String>,
    pub goals: Option<String>,
    pub experience_level: Option<String>,
    pub music_preferences: Option<String>,
    pub weekly_hours_available: Option<String>,
    pub equipment_access: Option<String>,
    pub additional_notes: String,
    pub created_at: String,
}

impl NewSubmission {
    pub fn from_request(customer_id: String, request: OnboardingRequest, created_at: String) -> Self {
        Self {
            customer_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            location: request.location,
            preferred_start_date: request.preferred_start_date,
            preferred_instructor: request.preferred_instructor,
            lesson_package: request.lesson_package,
            goals: request.goals,
            experience_level: request.experience_level,
            music_preferences: request.music_preferences.as_ref().map(MusicPreferences::to_stored),
            weekly_hours_available: request.weekly_hours_available,
            equipment_access: request.equipment_access,
            additional_notes: request.additional_notes.unwrap_or_default(),
            created_at,
        }
    }
}

/// A stored onboarding submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmission {
    pub id: i64,
    pub customer_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub preferred_start_date: Option<String>,
    pub preferred_instructor: Option<String>,
    pub lesson_package: Option<String>,
    pub goals: Option<String>,
    pub experience_level: Option<String>,
    pub music_preferences: Option<String>,
    pub weekly_hours_available: Option<String>,
    pub equipment_access: Option<String>,
    pub additional_notes: String,
    pub created_at: String,
}

/// Result of a fully successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub message: String,
    pub submission_id: i64,
    pub customer_id: String,
}
