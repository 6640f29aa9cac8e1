use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use gradebook_core::{AppError, PaginationParams};
use gradebook_models::{CourseId, GradeId, UserId};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::voter::{
    Attribute, CourseVoter, GradeVoter, deny_access_unless_granted,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::{JsonBody, validate_payload};

use super::model::{
    CreateGradeDto, DeletedGradesResponse, Grade, GradeDetail, GradeTypeFilter,
    PaginatedGradesResponse, UpdateGradeDto,
};
use super::service::{GradeService, parse_grade_type};

#[utoipa::path(
    get,
    path = "/api/teacher/grades",
    params(PaginationParams),
    responses(
        (status = 200, description = "Grades of the caller's courses, newest first", body = PaginatedGradesResponse),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Teachers and admins only", body = crate::docs::ErrorResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_teacher_grades(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedGradesResponse>, AppError> {
    let teacher_id = if auth_user.is_admin() {
        None
    } else {
        Some(auth_user.user_id()?)
    };

    Ok(Json(
        GradeService::grades_for_teacher(&state.db, teacher_id, &pagination).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/teacher/courses/{id}/grades",
    params(
        ("id" = String, Path, description = "Course ID"),
        GradeTypeFilter
    ),
    responses(
        (status = 200, description = "Grades of the course, newest first", body = Vec<GradeDetail>),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse),
        (status = 422, description = "Unknown grade type", body = crate::docs::ErrorResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_course_grades(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
    Query(filter): Query<GradeTypeFilter>,
) -> Result<Json<Vec<GradeDetail>>, AppError> {
    let course = CourseService::get_course(&state.db, course_id).await?;
    deny_access_unless_granted::<CourseVoter>(&auth_user, Attribute::View, &course)?;

    let grade_type = parse_grade_type(filter.grade_type.as_deref())?;
    Ok(Json(
        GradeService::grades_by_course(&state.db, course_id, grade_type).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/teacher/courses/{id}/grades",
    params(("id" = String, Path, description = "Course ID")),
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = Grade),
        (status = 400, description = "Student is not enrolled in this course", body = crate::docs::ErrorResponse),
        (status = 403, description = "Not the course teacher", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse),
        (status = 422, description = "Invalid value, type or coefficient", body = crate::docs::ErrorResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn add_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
    JsonBody(dto): JsonBody<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    let course = CourseService::get_course(&state.db, course_id).await?;
    deny_access_unless_granted::<CourseVoter>(&auth_user, Attribute::Edit, &course)?;
    validate_payload(&dto)?;

    let grade_type = parse_grade_type(dto.grade_type.as_deref())?;
    let grade = GradeService::add_grade(
        &state.db,
        dto.student_id,
        course_id,
        dto.value,
        grade_type,
        dto.coefficient,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(grade)))
}

#[utoipa::path(
    put,
    path = "/api/teacher/grades/{id}",
    params(("id" = String, Path, description = "Grade ID")),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated", body = Grade),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Grade not found", body = crate::docs::ErrorResponse),
        (status = 422, description = "Invalid value, type or coefficient", body = crate::docs::ErrorResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GradeId>,
    JsonBody(dto): JsonBody<UpdateGradeDto>,
) -> Result<Json<Grade>, AppError> {
    let subject = GradeService::get_grade_subject(&state.db, id).await?;
    deny_access_unless_granted::<GradeVoter>(&auth_user, Attribute::Edit, &subject)?;
    validate_payload(&dto)?;

    let grade_type = parse_grade_type(dto.grade_type.as_deref())?;
    let grade =
        GradeService::update_grade(&state.db, id, dto.value, grade_type, dto.coefficient).await?;

    Ok(Json(grade))
}

#[utoipa::path(
    delete,
    path = "/api/teacher/grades/{id}",
    params(("id" = String, Path, description = "Grade ID")),
    responses(
        (status = 204, description = "Grade deleted"),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Grade not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GradeId>,
) -> Result<StatusCode, AppError> {
    let subject = GradeService::get_grade_subject(&state.db, id).await?;
    deny_access_unless_granted::<GradeVoter>(&auth_user, Attribute::Delete, &subject)?;

    GradeService::delete_grade(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/teacher/courses/{id}/students/{student_id}/grades",
    params(
        ("id" = String, Path, description = "Course ID"),
        ("student_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Number of grades removed", body = DeletedGradesResponse),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_student_grades(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, student_id)): Path<(CourseId, UserId)>,
) -> Result<Json<DeletedGradesResponse>, AppError> {
    let course = CourseService::get_course(&state.db, course_id).await?;
    deny_access_unless_granted::<CourseVoter>(&auth_user, Attribute::Edit, &course)?;

    let deleted =
        GradeService::delete_by_student_and_course(&state.db, student_id, course_id).await?;
    Ok(Json(DeletedGradesResponse { deleted }))
}

#[utoipa::path(
    get,
    path = "/api/grades/{id}",
    params(("id" = String, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade details", body = Grade),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Grade not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn show_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GradeId>,
) -> Result<Json<Grade>, AppError> {
    let subject = GradeService::get_grade_subject(&state.db, id).await?;
    deny_access_unless_granted::<GradeVoter>(&auth_user, Attribute::View, &subject)?;

    Ok(Json(subject.grade))
}
