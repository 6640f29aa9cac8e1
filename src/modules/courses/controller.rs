use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use gradebook_core::AppError;
use gradebook_models::CourseId;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::voter::{Attribute, CourseVoter, deny_access_unless_granted};
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    Course, CourseSummary, CreateCourseDto, EnrolledStudent, TeacherDashboardResponse,
    UpdateCourseDto,
};
use super::service::CourseService;

#[utoipa::path(
    get,
    path = "/api/teacher/dashboard",
    responses(
        (status = 200, description = "Courses managed by the current user", body = TeacherDashboardResponse),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Teachers and admins only", body = crate::docs::ErrorResponse)
    ),
    tag = "Teacher",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn teacher_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<TeacherDashboardResponse>, AppError> {
    let courses =
        CourseService::find_managed_by(&state.db, auth_user.user_id()?, auth_user.is_admin())
            .await?;

    Ok(Json(TeacherDashboardResponse {
        total_courses: courses.len(),
        courses,
    }))
}

#[utoipa::path(
    get,
    path = "/api/teacher/courses",
    responses(
        (status = 200, description = "Courses ordered by title", body = Vec<CourseSummary>),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Teachers and admins only", body = crate::docs::ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_my_courses(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let courses =
        CourseService::find_managed_by(&state.db, auth_user.user_id()?, auth_user.is_admin())
            .await?;
    Ok(Json(courses))
}

#[utoipa::path(
    post,
    path = "/api/teacher/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created, owned by the caller", body = Course),
        (status = 400, description = "Malformed request", body = crate::docs::ErrorResponse),
        (status = 422, description = "Validation error", body = crate::docs::ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/teacher/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = CourseSummary),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn show_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
) -> Result<Json<CourseSummary>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    deny_access_unless_granted::<CourseVoter>(&auth_user, Attribute::View, &course)?;

    Ok(Json(CourseService::get_course_summary(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/teacher/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse),
        (status = 422, description = "Validation error", body = crate::docs::ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    deny_access_unless_granted::<CourseVoter>(&auth_user, Attribute::Edit, &course)?;

    Ok(Json(CourseService::update_course(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/teacher/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted with its enrollments and grades"),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    deny_access_unless_granted::<CourseVoter>(&auth_user, Attribute::Delete, &course)?;

    CourseService::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/teacher/courses/{id}/enrollments",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled students, most recent first", body = Vec<EnrolledStudent>),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn course_enrollments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
) -> Result<Json<Vec<EnrolledStudent>>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    deny_access_unless_granted::<CourseVoter>(&auth_user, Attribute::View, &course)?;

    Ok(Json(EnrollmentService::find_by_course(&state.db, id).await?))
}
