//! Student handlers: directory, progress and onboarding.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::state::AppState;
use crate::auth::CurrentShop;
use crate::onboarding::{OnboardingRequest, SubmissionReceipt};
use crate::progress::StudentProgress;
use crate::shopify::CustomerId;
use crate::student::Student;

/// Query of `GET /students/progress`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    pub customer_id: Option<String>,
}

/// Body returned after a flag-only update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardedResponse {
    pub customer_id: String,
    pub onboarded: bool,
}

fn parse_customer_id(raw: &str) -> ApiResult<CustomerId> {
    CustomerId::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid customer id"))
}

/// List students with their onboarding state.
#[instrument(skip(state, shop))]
pub async fn list_students(
    State(state): State<AppState>,
    shop: CurrentShop,
) -> ApiResult<Json<Vec<Student>>> {
    let students = state.students.list(shop.session()).await?;
    Ok(Json(students))
}

/// Get a single student.
#[instrument(skip(state, shop))]
pub async fn get_student(
    State(state): State<AppState>,
    shop: CurrentShop,
    Path(id): Path<String>,
) -> ApiResult<Json<Student>> {
    let customer = parse_customer_id(&id)?;
    state
        .students
        .get(shop.session(), &customer)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Student {} not found", id)))
}

/// Registered courses of a student with lesson completion.
#[instrument(skip(state, shop))]
pub async fn student_progress(
    State(state): State<AppState>,
    shop: CurrentShop,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> ApiResult<Json<StudentProgress>> {
    let raw = query
        .customer_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("customerId is required"))?;
    let customer = parse_customer_id(raw)?;

    let progress = state.progress.student_progress(shop.session(), &customer).await?;
    Ok(Json(progress))
}

/// Store an intake form and mark the student as onboarded.
#[instrument(skip(state, shop, request))]
pub async fn submit_onboarding(
    State(state): State<AppState>,
    shop: CurrentShop,
    ApiJson(request): ApiJson<OnboardingRequest>,
) -> ApiResult<Json<SubmissionReceipt>> {
    let receipt = state.onboarding.submit(shop.session(), request).await?;
    Ok(Json(receipt))
}

/// Set the onboarded flag without storing a submission.
#[instrument(skip(state, shop))]
pub async fn mark_onboarded(
    State(state): State<AppState>,
    shop: CurrentShop,
    Path(id): Path<String>,
) -> ApiResult<Json<OnboardedResponse>> {
    let customer = parse_customer_id(&id)?;
    state
        .onboarding
        .mark_onboarded(shop.session(), &customer)
        .await?;

    info!(customer = %customer, "Onboarded flag set");
    Ok(Json(OnboardedResponse {
        customer_id: customer.legacy().to_string(),
        onboarded: true,
    }))
}
