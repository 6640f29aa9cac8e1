use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use gradebook_core::{PaginationMeta, PaginationParams};
use gradebook_models::{
    ClassStatistics, Course, CourseStatistics, CourseSummary, CreateCourseDto, CreateGradeDto,
    DeletedGradesResponse, DistributionBucket, EnrolledStudent, Enrollment, Grade, GradeDetail,
    GradeType, LoginRequest, LoginResponse, RankingEntry, RankingPosition, RegisterRequestDto,
    StudentEnrollment, StudentProgress, TypeAverage, UpdateCourseDto, UpdateGradeDto, User,
    UserRole,
};

use crate::modules::courses::TeacherDashboardResponse;
use crate::modules::enrollments::StudentDashboardResponse;
use crate::modules::grades::PaginatedGradesResponse;
use crate::modules::home::HomeResponse;
use crate::modules::statistics::{
    CourseGradesOverview, CourseProgressOverview, CourseRankingOverview,
    CourseStatisticsResponse, StudentCourseGradesResponse, StudentGradesResponse,
    StudentStatisticsResponse,
};

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Access denied")]
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_profile,
        crate::modules::home::controller::home,
        crate::modules::courses::controller::teacher_dashboard,
        crate::modules::courses::controller::list_my_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::show_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::course_enrollments,
        crate::modules::grades::controller::list_teacher_grades,
        crate::modules::grades::controller::list_course_grades,
        crate::modules::grades::controller::add_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::grades::controller::delete_student_grades,
        crate::modules::grades::controller::show_grade,
        crate::modules::statistics::controller::statistics_index,
        crate::modules::statistics::controller::course_statistics,
        crate::modules::statistics::controller::my_grades,
        crate::modules::statistics::controller::course_grades,
        crate::modules::statistics::controller::my_statistics,
        crate::modules::enrollments::controller::student_dashboard,
        crate::modules::enrollments::controller::available_courses,
        crate::modules::enrollments::controller::enroll,
        crate::modules::enrollments::controller::drop_enrollment,
        crate::modules::reports::controller::download_bulletin,
        crate::modules::reports::controller::view_bulletin,
        crate::modules::reports::controller::download_course_report,
        crate::modules::reports::controller::view_course_report,
    ),
    components(
        schemas(
            ErrorResponse,
            User,
            UserRole,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            HomeResponse,
            Course,
            CourseSummary,
            CreateCourseDto,
            UpdateCourseDto,
            TeacherDashboardResponse,
            Enrollment,
            EnrolledStudent,
            StudentEnrollment,
            StudentDashboardResponse,
            Grade,
            GradeDetail,
            GradeType,
            CreateGradeDto,
            UpdateGradeDto,
            DeletedGradesResponse,
            PaginatedGradesResponse,
            PaginationMeta,
            PaginationParams,
            RankingEntry,
            RankingPosition,
            TypeAverage,
            ClassStatistics,
            DistributionBucket,
            StudentProgress,
            CourseStatistics,
            CourseRankingOverview,
            CourseStatisticsResponse,
            CourseGradesOverview,
            StudentGradesResponse,
            StudentCourseGradesResponse,
            CourseProgressOverview,
            StudentStatisticsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and current user"),
        (name = "Home", description = "Public landing page data"),
        (name = "Teacher", description = "Teacher dashboard"),
        (name = "Courses", description = "Course management for teachers"),
        (name = "Grades", description = "Grade entry and lookup"),
        (name = "Statistics", description = "Rankings, class statistics and distributions"),
        (name = "Student", description = "Enrollments, grades and statistics of the current student"),
        (name = "Reports", description = "PDF bulletins and course reports")
    ),
    info(
        title = "Gradebook API",
        version = "0.1.0",
        description = "School grade management: courses, enrollments, weighted grades, rankings and PDF report cards.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_bearer_scheme_and_routes() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/api/teacher/courses/{id}/grades"));
        assert!(doc.paths.paths.contains_key("/api/student/reports/bulletins/{course_id}"));
    }
}
