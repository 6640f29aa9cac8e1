pub use gradebook_models::{
    CreateGradeDto, DeletedGradesResponse, Grade, GradeDetail, GradeType, GradeTypeFilter,
    UpdateGradeDto,
};

use gradebook_core::PaginationMeta;
use gradebook_models::UserId;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::middleware::voter::GradeSubject;

/// A grade row joined with the teacher of its course.
#[derive(Debug, Clone, FromRow)]
pub struct GradeWithOwner {
    #[sqlx(flatten)]
    pub grade: Grade,
    pub teacher_id: UserId,
}

impl From<GradeWithOwner> for GradeSubject {
    fn from(row: GradeWithOwner) -> Self {
        GradeSubject {
            grade: row.grade,
            course_teacher_id: row.teacher_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedGradesResponse {
    pub data: Vec<GradeDetail>,
    pub meta: PaginationMeta,
}
