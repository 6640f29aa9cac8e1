pub use gradebook_models::{CourseSummary, EnrolledStudent, Enrollment, StudentEnrollment};

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentDashboardResponse {
    /// Newest first
    pub enrollments: Vec<StudentEnrollment>,
    /// Same courses with teacher and class size, by title
    pub courses: Vec<CourseSummary>,
}
