use gradebook_models::CourseSummary;
use serde::Serialize;
use utoipa::ToSchema;

/// Public landing page figures.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HomeResponse {
    pub total_courses: i64,
    pub total_users: i64,
    /// The six most recently created courses
    pub recent_courses: Vec<CourseSummary>,
}
