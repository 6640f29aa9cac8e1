use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use gradebook_core::AppError;
use gradebook_models::CourseId;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::voter::{Attribute, CourseVoter, deny_access_unless_granted};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;

use super::service::ReportService;

const BULLETIN_FILENAME: &str = "bulletin.pdf";
const COURSE_REPORT_FILENAME: &str = "course_report.pdf";

#[derive(Debug, Clone, Copy)]
enum Disposition {
    Attachment,
    Inline,
}

fn pdf_response(bytes: Vec<u8>, filename: &str, disposition: Disposition) -> Response {
    let kind = match disposition {
        Disposition::Attachment => "attachment",
        Disposition::Inline => "inline",
    };

    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("{kind}; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn bulletin(
    state: &AppState,
    auth_user: &AuthUser,
    course_id: CourseId,
    disposition: Disposition,
) -> Result<Response, AppError> {
    let bytes = ReportService::bulletin(
        &state.db,
        &state.report_config,
        auth_user.user_id()?,
        course_id,
    )
    .await?;
    Ok(pdf_response(bytes, BULLETIN_FILENAME, disposition))
}

async fn course_report(
    state: &AppState,
    auth_user: &AuthUser,
    course_id: CourseId,
    disposition: Disposition,
) -> Result<Response, AppError> {
    let course = CourseService::get_course(&state.db, course_id).await?;
    deny_access_unless_granted::<CourseVoter>(auth_user, Attribute::View, &course)?;

    let bytes = ReportService::course_report(&state.db, &state.report_config, course_id).await?;
    Ok(pdf_response(bytes, COURSE_REPORT_FILENAME, disposition))
}

#[utoipa::path(
    get,
    path = "/api/student/reports/bulletins/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Bulletin as a PDF attachment", body = Vec<u8>, content_type = "application/pdf"),
        (status = 403, description = "You are not enrolled in this course", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn download_bulletin(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
) -> Result<Response, AppError> {
    bulletin(&state, &auth_user, course_id, Disposition::Attachment).await
}

#[utoipa::path(
    get,
    path = "/api/student/reports/bulletins/{course_id}/view",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Bulletin displayed inline", body = Vec<u8>, content_type = "application/pdf"),
        (status = 403, description = "You are not enrolled in this course", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn view_bulletin(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
) -> Result<Response, AppError> {
    bulletin(&state, &auth_user, course_id, Disposition::Inline).await
}

#[utoipa::path(
    get,
    path = "/api/teacher/reports/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course report as a PDF attachment", body = Vec<u8>, content_type = "application/pdf"),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn download_course_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
) -> Result<Response, AppError> {
    course_report(&state, &auth_user, id, Disposition::Attachment).await
}

#[utoipa::path(
    get,
    path = "/api/teacher/reports/courses/{id}/view",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course report displayed inline", body = Vec<u8>, content_type = "application/pdf"),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn view_course_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
) -> Result<Response, AppError> {
    course_report(&state, &auth_user, id, Disposition::Inline).await
}
