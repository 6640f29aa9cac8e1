use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use gradebook_core::AppError;
use gradebook_models::CourseId;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;

use super::model::{CourseSummary, Enrollment, StudentDashboardResponse};
use super::service::EnrollmentService;

#[utoipa::path(
    get,
    path = "/api/student/dashboard",
    responses(
        (status = 200, description = "Enrollments of the current student, newest first", body = StudentDashboardResponse),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Students only", body = crate::docs::ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn student_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentDashboardResponse>, AppError> {
    let student_id = auth_user.user_id()?;
    let enrollments = EnrollmentService::find_by_student(&state.db, student_id).await?;
    let courses = CourseService::find_courses_for_student(&state.db, student_id).await?;

    Ok(Json(StudentDashboardResponse {
        enrollments,
        courses,
    }))
}

#[utoipa::path(
    get,
    path = "/api/student/enrollments/available",
    responses(
        (status = 200, description = "Courses the student is not enrolled in", body = Vec<CourseSummary>),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Students only", body = crate::docs::ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn available_courses(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let courses = CourseService::find_available_for_student(&state.db, auth_user.user_id()?).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    post,
    path = "/api/student/enrollments/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 400, description = "Already enrolled", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn enroll(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = EnrollmentService::enroll(&state.db, auth_user.user_id()?, course_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[utoipa::path(
    delete,
    path = "/api/student/enrollments/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Dropped from the course; grades are kept"),
        (status = 400, description = "Not enrolled", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn drop_enrollment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    EnrollmentService::drop_enrollment(&state.db, auth_user.user_id()?, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
