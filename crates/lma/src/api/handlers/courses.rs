//! Course handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::CurrentShop;
use crate::catalog::{Course, CourseSummary};

/// List all courses (scalar fields only).
#[instrument(skip(state, shop))]
pub async fn list_courses(
    State(state): State<AppState>,
    shop: CurrentShop,
) -> ApiResult<Json<Vec<CourseSummary>>> {
    let courses = state.catalog.list_courses(shop.session()).await?;
    Ok(Json(courses))
}

/// Full course tree by handle.
#[instrument(skip(state, shop))]
pub async fn get_course(
    State(state): State<AppState>,
    shop: CurrentShop,
    Path(handle): Path<String>,
) -> ApiResult<Json<Course>> {
    state
        .catalog
        .course_by_handle(shop.session(), &handle)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Course {} not found", handle)))
}
