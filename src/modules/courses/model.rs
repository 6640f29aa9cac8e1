pub use gradebook_models::{Course, CourseSummary, CreateCourseDto, EnrolledStudent, UpdateCourseDto};

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeacherDashboardResponse {
    pub courses: Vec<CourseSummary>,
    pub total_courses: usize,
}
