//! Course entity and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::{CourseId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course with its teacher and enrollment count, as shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseSummary {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: UserId,
    pub teacher_name: String,
    pub enrollment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Titles are stored trimmed, so the bounds apply to the trimmed text.
fn validate_title(title: &str) -> Result<(), ValidationError> {
    let length = title.trim().chars().count();
    if (1..=255).contains(&length) {
        Ok(())
    } else {
        Err(ValidationError::new("title_length")
            .with_message("Title must be between 1 and 255 characters".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_course_title_bounds() {
        let empty = CreateCourseDto {
            title: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());

        let long = CreateCourseDto {
            title: "x".repeat(256),
            description: None,
        };
        assert!(long.validate().is_err());

        let ok = CreateCourseDto {
            title: "Mathematics".to_string(),
            description: Some("Algebra and geometry".to_string()),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let create = CreateCourseDto {
            title: "   ".to_string(),
            description: None,
        };
        assert!(create.validate().is_err());

        let update = UpdateCourseDto {
            title: Some("\t \n".to_string()),
            description: None,
        };
        assert!(update.validate().is_err());

        let padded = CreateCourseDto {
            title: format!("  {}  ", "x".repeat(255)),
            description: None,
        };
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn test_update_course_allows_missing_title() {
        let dto = UpdateCourseDto {
            title: None,
            description: Some("New description".to_string()),
        };
        assert!(dto.validate().is_ok());
    }
}
