//! Grade entity, grade types and DTOs.
//!
//! Grades are scored on a 0 to 20 scale and weighted by an integer
//! coefficient of at least 1.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{CourseId, GradeId, UserId};

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 20.0;
pub const MIN_COEFFICIENT: i32 = 1;

/// Kind of assessment. Stored as the postgres enum `grade_type`.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
)]
#[sqlx(type_name = "grade_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GradeType {
    #[default]
    Exam,
    Assignment,
    Participation,
    Project,
}

impl GradeType {
    pub const ALL: [GradeType; 4] = [
        GradeType::Exam,
        GradeType::Assignment,
        GradeType::Participation,
        GradeType::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GradeType::Exam => "exam",
            GradeType::Assignment => "assignment",
            GradeType::Participation => "participation",
            GradeType::Project => "project",
        }
    }
}

impl fmt::Display for GradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GradeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = GradeType::ALL.iter().map(|t| t.as_str()).collect();
                format!("Grade type must be one of: {}", valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: GradeId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub value: f64,
    #[serde(rename = "type")]
    pub grade_type: GradeType,
    pub coefficient: i32,
    pub created_at: DateTime<Utc>,
}

/// A grade joined with its student and course, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GradeDetail {
    pub id: GradeId,
    pub student_id: UserId,
    pub student_name: Option<String>,
    pub student_email: String,
    pub course_id: CourseId,
    pub course_title: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub grade_type: GradeType,
    pub coefficient: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGradeDto {
    pub student_id: UserId,
    #[validate(range(min = 0.0, max = 20.0, message = "Grade must be between 0 and 20"))]
    #[schema(example = 15.5)]
    pub value: f64,
    /// Defaults to `exam`
    #[serde(rename = "type")]
    #[schema(example = "exam")]
    pub grade_type: Option<String>,
    /// Defaults to 1
    #[validate(range(min = 1, message = "Coefficient must be at least 1"))]
    pub coefficient: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateGradeDto {
    #[validate(range(min = 0.0, max = 20.0, message = "Grade must be between 0 and 20"))]
    pub value: f64,
    /// Unchanged when omitted
    #[serde(rename = "type")]
    pub grade_type: Option<String>,
    /// Unchanged when omitted
    #[validate(range(min = 1, message = "Coefficient must be at least 1"))]
    pub coefficient: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GradeTypeFilter {
    /// Only return grades of this type
    #[serde(rename = "type")]
    pub grade_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedGradesResponse {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_type_from_str() {
        assert_eq!("project".parse::<GradeType>().unwrap(), GradeType::Project);
        assert_eq!(
            "homework".parse::<GradeType>().unwrap_err(),
            "Grade type must be one of: exam, assignment, participation, project"
        );
    }

    #[test]
    fn test_grade_serializes_type_field() {
        let grade = Grade {
            id: GradeId::new(),
            student_id: UserId::new(),
            course_id: CourseId::new(),
            value: 14.0,
            grade_type: GradeType::Assignment,
            coefficient: 2,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&grade).unwrap();
        assert_eq!(json["type"], "assignment");
        assert_eq!(json["coefficient"], 2);
    }

    #[test]
    fn test_create_grade_dto_validation() {
        let dto: CreateGradeDto = serde_json::from_value(serde_json::json!({
            "student_id": UserId::new(),
            "value": 21.0,
            "coefficient": 0
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("value"));
        assert!(fields.contains_key("coefficient"));
        assert!(dto.grade_type.is_none());
    }
}
