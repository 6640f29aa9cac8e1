use axum::{Json, extract::State};
use gradebook_core::AppError;
use tracing::instrument;

use crate::state::AppState;

use super::model::HomeResponse;
use super::service::HomeService;

#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Course and user totals with the newest courses", body = HomeResponse)
    ),
    tag = "Home"
)]
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    Ok(Json(HomeService::overview(&state.db).await?))
}
