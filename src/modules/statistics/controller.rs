use axum::{
    Json,
    extract::{Path, State},
};
use gradebook_core::AppError;
use gradebook_models::CourseId;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::voter::{Attribute, CourseVoter, deny_access_unless_granted};
use crate::modules::courses::service::CourseService;
use crate::modules::enrollments::service::EnrollmentService;
use crate::modules::grades::service::GradeService;
use crate::state::AppState;

use super::calculator::{self, by_average_desc};
use super::model::{
    CourseGradesOverview, CourseProgressOverview, CourseRankingOverview,
    CourseStatisticsResponse, StudentCourseGradesResponse, StudentGradesResponse,
    StudentStatisticsResponse,
};
use super::service::StatisticsService;

#[utoipa::path(
    get,
    path = "/api/teacher/statistics",
    responses(
        (status = 200, description = "Ranking of every managed course", body = Vec<CourseRankingOverview>),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Teachers and admins only", body = crate::docs::ErrorResponse)
    ),
    tag = "Statistics",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn statistics_index(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<CourseRankingOverview>>, AppError> {
    let courses =
        CourseService::find_managed_by(&state.db, auth_user.user_id()?, auth_user.is_admin())
            .await?;

    let mut overviews = Vec::with_capacity(courses.len());
    for course in courses {
        let ranking = StatisticsService::course_ranking(&state.db, course.id).await?;
        overviews.push(CourseRankingOverview {
            student_count: ranking.len(),
            course,
            ranking,
        });
    }

    Ok(Json(overviews))
}

#[utoipa::path(
    get,
    path = "/api/teacher/statistics/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Ranking, class statistics and distribution", body = CourseStatisticsResponse),
        (status = 403, description = "Access denied", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Statistics",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn course_statistics(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
) -> Result<Json<CourseStatisticsResponse>, AppError> {
    let course = CourseService::get_course(&state.db, course_id).await?;
    deny_access_unless_granted::<CourseVoter>(&auth_user, Attribute::View, &course)?;

    let statistics = StatisticsService::recalculate_all(&state.db, course_id).await?;
    Ok(Json(CourseStatisticsResponse { course, statistics }))
}

#[utoipa::path(
    get,
    path = "/api/student/grades",
    responses(
        (status = 200, description = "Grades of every enrollment with averages and rank", body = StudentGradesResponse),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Students only", body = crate::docs::ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn my_grades(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentGradesResponse>, AppError> {
    let student_id = auth_user.user_id()?;
    let enrollments = EnrollmentService::find_by_student(&state.db, student_id).await?;

    let mut courses = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let grades =
            GradeService::grades_by_student_and_course(&state.db, student_id, enrollment.course_id)
                .await?;
        let ranking = StatisticsService::student_ranking_position(
            &state.db,
            student_id,
            enrollment.course_id,
        )
        .await?;

        courses.push(CourseGradesOverview {
            average: calculator::weighted_average(&grades),
            grade_count: grades.len(),
            enrollment,
            grades,
            ranking,
        });
    }
    courses.sort_by(|a, b| by_average_desc(a.average, b.average));

    let overall_average = StatisticsService::overall_average(&state.db, student_id).await?;

    Ok(Json(StudentGradesResponse {
        courses,
        overall_average,
    }))
}

#[utoipa::path(
    get,
    path = "/api/student/grades/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Grades, averages and rank in one course", body = StudentCourseGradesResponse),
        (status = 403, description = "You are not enrolled in this course", body = crate::docs::ErrorResponse),
        (status = 404, description = "Course not found", body = crate::docs::ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn course_grades(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
) -> Result<Json<StudentCourseGradesResponse>, AppError> {
    let student_id = auth_user.user_id()?;
    let course = CourseService::get_course_summary(&state.db, course_id).await?;
    EnrollmentService::ensure_enrolled(&state.db, student_id, course_id).await?;

    let grades = GradeService::grades_by_student_and_course(&state.db, student_id, course_id).await?;
    let average =
        StatisticsService::average_for_student_in_course(&state.db, student_id, course_id).await?;
    let averages_by_type =
        StatisticsService::averages_by_type(&state.db, student_id, course_id).await?;
    let progress = StatisticsService::student_progress(&state.db, student_id, course_id).await?;
    let ranking =
        StatisticsService::student_ranking_position(&state.db, student_id, course_id).await?;

    Ok(Json(StudentCourseGradesResponse {
        course,
        grades,
        average,
        averages_by_type,
        progress,
        ranking,
    }))
}

#[utoipa::path(
    get,
    path = "/api/student/statistics",
    responses(
        (status = 200, description = "Progress and rank per enrollment", body = StudentStatisticsResponse),
        (status = 401, description = "Unauthorized", body = crate::docs::ErrorResponse),
        (status = 403, description = "Students only", body = crate::docs::ErrorResponse)
    ),
    tag = "Student",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn my_statistics(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentStatisticsResponse>, AppError> {
    let student_id = auth_user.user_id()?;
    let enrollments = EnrollmentService::find_by_student(&state.db, student_id).await?;
    let enrollment_count = enrollments.len();

    let mut courses = Vec::with_capacity(enrollment_count);
    for enrollment in enrollments {
        let course_id = enrollment.course_id;
        let progress = StatisticsService::student_progress(&state.db, student_id, course_id).await?;
        let ranking =
            StatisticsService::student_ranking_position(&state.db, student_id, course_id).await?;

        courses.push(CourseProgressOverview {
            average: progress.average,
            enrollment,
            progress,
            ranking,
        });
    }
    courses.sort_by(|a, b| by_average_desc(a.average, b.average));

    let overall_average = StatisticsService::overall_average(&state.db, student_id).await?;

    Ok(Json(StudentStatisticsResponse {
        courses,
        overall_average,
        enrollment_count,
    }))
}
