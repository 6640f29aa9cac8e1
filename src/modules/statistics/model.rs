pub use gradebook_models::{
    AveragesByType, ClassStatistics, CourseStatistics, DistributionBucket, RankingEntry,
    RankingPosition, StudentProgress, TypeAverage,
};

use gradebook_models::{Course, CourseSummary, Grade, StudentEnrollment};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseRankingOverview {
    pub course: CourseSummary,
    pub ranking: Vec<RankingEntry>,
    pub student_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseStatisticsResponse {
    pub course: Course,
    #[serde(flatten)]
    pub statistics: CourseStatistics,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseGradesOverview {
    pub enrollment: StudentEnrollment,
    pub grades: Vec<Grade>,
    pub average: f64,
    pub ranking: Option<RankingPosition>,
    pub grade_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentGradesResponse {
    /// Sorted by average, highest first
    pub courses: Vec<CourseGradesOverview>,
    pub overall_average: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentCourseGradesResponse {
    pub course: CourseSummary,
    pub grades: Vec<Grade>,
    pub average: f64,
    #[schema(value_type = Object)]
    pub averages_by_type: AveragesByType,
    pub progress: StudentProgress,
    pub ranking: Option<RankingPosition>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseProgressOverview {
    pub enrollment: StudentEnrollment,
    pub average: f64,
    pub progress: StudentProgress,
    pub ranking: Option<RankingPosition>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentStatisticsResponse {
    /// Sorted by average, highest first
    pub courses: Vec<CourseProgressOverview>,
    pub overall_average: f64,
    pub enrollment_count: usize,
}
