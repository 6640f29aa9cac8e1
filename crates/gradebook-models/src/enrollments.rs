//! Enrollment entity and joined views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{CourseId, EnrollmentId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
}

/// An enrollment of the current student, with course details.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentEnrollment {
    pub id: EnrollmentId,
    pub course_id: CourseId,
    pub course_title: String,
    pub course_description: Option<String>,
    pub teacher_name: String,
    pub enrolled_at: DateTime<Utc>,
}

/// A student enrolled in a given course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EnrolledStudent {
    pub enrollment_id: EnrollmentId,
    pub student_id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub enrolled_at: DateTime<Utc>,
}
