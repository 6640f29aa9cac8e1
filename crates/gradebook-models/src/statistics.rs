//! Result shapes of the statistics computations.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::ids::UserId;

/// One line of a course ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RankingEntry {
    /// 1-based position
    pub rank: i64,
    pub student_id: UserId,
    pub name: Option<String>,
    pub email: String,
    /// Weighted average, 0 when the student has no grade
    pub average: f64,
    pub grade_count: i64,
}

/// Aggregates of one enrolled student, as read from the database before
/// ranking.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StudentAggregate {
    pub student_id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub weighted_sum: Option<f64>,
    pub coefficient_sum: Option<i64>,
    pub grade_count: i64,
}

/// Where a student stands in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RankingPosition {
    pub rank: i64,
    pub average: f64,
    pub total_students: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TypeAverage {
    pub average: f64,
    pub count: i64,
}

/// Per-type averages keyed by grade type name.
pub type AveragesByType = BTreeMap<String, TypeAverage>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassStatistics {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub student_count: i64,
    pub total_grades: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DistributionBucket {
    pub range: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentProgress {
    pub total_grades: i64,
    pub average: f64,
    pub min_grade: f64,
    pub max_grade: f64,
}

/// Everything the teacher's course statistics page shows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseStatistics {
    pub ranking: Vec<RankingEntry>,
    pub statistics: ClassStatistics,
    pub distribution: Vec<DistributionBucket>,
}
