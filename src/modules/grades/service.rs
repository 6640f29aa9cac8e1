use anyhow::Context;
use gradebook_core::{AppError, PaginationMeta, PaginationParams};
use gradebook_models::{CourseId, GRADE_MAX, GRADE_MIN, GradeId, MIN_COEFFICIENT, UserId};
use sqlx::PgPool;
use tracing::instrument;

use crate::middleware::voter::GradeSubject;
use crate::modules::enrollments::service::EnrollmentService;

use super::events::{GradeAction, grade_changed, grades_cleared};
use super::model::{Grade, GradeDetail, GradeType, GradeWithOwner, PaginatedGradesResponse};

const GRADE_COLUMNS: &str = "id, student_id, course_id, value, grade_type, coefficient, created_at";

const DETAIL_SELECT: &str = r#"SELECT
        g.id,
        g.student_id,
        s.name AS student_name,
        s.email AS student_email,
        g.course_id,
        c.title AS course_title,
        g.value,
        g.grade_type,
        g.coefficient,
        g.created_at
    FROM grades g
    JOIN users s ON s.id = g.student_id
    JOIN courses c ON c.id = g.course_id"#;

pub fn check_value(value: f64) -> Result<(), AppError> {
    if !value.is_finite() || !(GRADE_MIN..=GRADE_MAX).contains(&value) {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "Grade must be between {} and {}",
            GRADE_MIN,
            GRADE_MAX
        )));
    }
    Ok(())
}

pub fn check_coefficient(coefficient: i32) -> Result<(), AppError> {
    if coefficient < MIN_COEFFICIENT {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "Coefficient must be at least {}",
            MIN_COEFFICIENT
        )));
    }
    Ok(())
}

/// `None` stays `None`; anything else must name a known grade type.
pub fn parse_grade_type(raw: Option<&str>) -> Result<Option<GradeType>, AppError> {
    raw.map(|t| t.trim().to_lowercase().parse::<GradeType>())
        .transpose()
        .map_err(|message| AppError::unprocessable(anyhow::anyhow!(message)))
}

pub struct GradeService;

impl GradeService {
    /// Records a grade for an enrolled student. Type defaults to `exam`,
    /// coefficient to 1.
    #[instrument(skip(db))]
    pub async fn add_grade(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
        value: f64,
        grade_type: Option<GradeType>,
        coefficient: Option<i32>,
    ) -> Result<Grade, AppError> {
        let grade_type = grade_type.unwrap_or_default();
        let coefficient = coefficient.unwrap_or(MIN_COEFFICIENT);

        check_value(value)?;
        check_coefficient(coefficient)?;

        if !EnrollmentService::is_enrolled(db, student_id, course_id).await? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Student is not enrolled in this course"
            )));
        }

        let grade = sqlx::query_as::<_, Grade>(&format!(
            r#"INSERT INTO grades (student_id, course_id, value, grade_type, coefficient)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {GRADE_COLUMNS}"#
        ))
        .bind(student_id)
        .bind(course_id)
        .bind(value)
        .bind(grade_type)
        .bind(coefficient)
        .fetch_one(db)
        .await
        .context("Failed to create grade")
        .map_err(AppError::database)?;

        grade_changed(GradeAction::Created, &grade);

        Ok(grade)
    }

    /// Replaces the value; type and coefficient change only when given.
    #[instrument(skip(db))]
    pub async fn update_grade(
        db: &PgPool,
        grade_id: GradeId,
        value: f64,
        grade_type: Option<GradeType>,
        coefficient: Option<i32>,
    ) -> Result<Grade, AppError> {
        check_value(value)?;
        if let Some(coefficient) = coefficient {
            check_coefficient(coefficient)?;
        }

        let grade = sqlx::query_as::<_, Grade>(&format!(
            r#"UPDATE grades
               SET value = $2,
                   grade_type = COALESCE($3, grade_type),
                   coefficient = COALESCE($4, coefficient)
               WHERE id = $1
               RETURNING {GRADE_COLUMNS}"#
        ))
        .bind(grade_id)
        .bind(value)
        .bind(grade_type)
        .bind(coefficient)
        .fetch_optional(db)
        .await
        .context("Failed to update grade")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade not found")))?;

        grade_changed(GradeAction::Updated, &grade);

        Ok(grade)
    }

    #[instrument(skip(db))]
    pub async fn delete_grade(db: &PgPool, grade_id: GradeId) -> Result<(), AppError> {
        let grade = sqlx::query_as::<_, Grade>(&format!(
            "DELETE FROM grades WHERE id = $1 RETURNING {GRADE_COLUMNS}"
        ))
        .bind(grade_id)
        .fetch_optional(db)
        .await
        .context("Failed to delete grade")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade not found")))?;

        grade_changed(GradeAction::Deleted, &grade);

        Ok(())
    }

    /// Loads a grade with its course owner, ready for a voter.
    #[instrument(skip(db))]
    pub async fn get_grade_subject(
        db: &PgPool,
        grade_id: GradeId,
    ) -> Result<GradeSubject, AppError> {
        let row = sqlx::query_as::<_, GradeWithOwner>(
            r#"SELECT g.id, g.student_id, g.course_id, g.value, g.grade_type, g.coefficient,
                      g.created_at, c.teacher_id
               FROM grades g
               JOIN courses c ON c.id = g.course_id
               WHERE g.id = $1"#,
        )
        .bind(grade_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch grade")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade not found")))?;

        Ok(row.into())
    }

    /// One page of the grades of every course taught by `teacher_id`, or of
    /// all courses when `None`. Newest first.
    #[instrument(skip(db))]
    pub async fn grades_for_teacher(
        db: &PgPool,
        teacher_id: Option<UserId>,
        pagination: &PaginationParams,
    ) -> Result<PaginatedGradesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM grades g
               JOIN courses c ON c.id = g.course_id
               WHERE ($1::uuid IS NULL OR c.teacher_id = $1)"#,
        )
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .context("Failed to count teacher grades")
        .map_err(AppError::database)?;

        let data = sqlx::query_as::<_, GradeDetail>(&format!(
            r#"{DETAIL_SELECT}
               WHERE ($1::uuid IS NULL OR c.teacher_id = $1)
               ORDER BY g.created_at DESC
               LIMIT $2 OFFSET $3"#
        ))
        .bind(teacher_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch teacher grades")
        .map_err(AppError::database)?;

        Ok(PaginatedGradesResponse {
            data,
            meta: PaginationMeta::new(total, pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn grades_by_course(
        db: &PgPool,
        course_id: CourseId,
        grade_type: Option<GradeType>,
    ) -> Result<Vec<GradeDetail>, AppError> {
        sqlx::query_as::<_, GradeDetail>(&format!(
            r#"{DETAIL_SELECT}
               WHERE g.course_id = $1 AND ($2::grade_type IS NULL OR g.grade_type = $2)
               ORDER BY g.created_at DESC"#
        ))
        .bind(course_id)
        .bind(grade_type)
        .fetch_all(db)
        .await
        .context("Failed to fetch course grades")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn grades_by_student_and_course(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<Grade>, AppError> {
        sqlx::query_as::<_, Grade>(&format!(
            r#"SELECT {GRADE_COLUMNS} FROM grades
               WHERE student_id = $1 AND course_id = $2
               ORDER BY created_at DESC"#
        ))
        .bind(student_id)
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student grades for course")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn grades_by_student(
        db: &PgPool,
        student_id: UserId,
    ) -> Result<Vec<Grade>, AppError> {
        sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE student_id = $1 ORDER BY created_at DESC"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student grades")
        .map_err(AppError::database)
    }

    /// Weighted average, `None` when the student has no grade in the course.
    #[instrument(skip(db))]
    pub async fn average_grade(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<f64>, AppError> {
        sqlx::query_scalar::<_, Option<f64>>(
            r#"SELECT SUM(value * coefficient) / NULLIF(SUM(coefficient), 0)::float8
               FROM grades
               WHERE student_id = $1 AND course_id = $2"#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(db)
        .await
        .context("Failed to compute average grade")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn count_by_student_and_course(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM grades WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(db)
        .await
        .context("Failed to count grades")
        .map_err(AppError::database)
    }

    pub async fn has_grades_in_course(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<bool, AppError> {
        Ok(Self::count_by_student_and_course(db, student_id, course_id).await? > 0)
    }

    /// Returns how many grades were removed.
    #[instrument(skip(db))]
    pub async fn delete_by_student_and_course(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<u64, AppError> {
        if !Self::has_grades_in_course(db, student_id, course_id).await? {
            return Ok(0);
        }

        let deleted = sqlx::query("DELETE FROM grades WHERE student_id = $1 AND course_id = $2")
            .bind(student_id)
            .bind(course_id)
            .execute(db)
            .await
            .context("Failed to delete grades")
            .map_err(AppError::database)?
            .rows_affected();

        grades_cleared(student_id, course_id, deleted);

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_check_value_bounds() {
        assert!(check_value(0.0).is_ok());
        assert!(check_value(20.0).is_ok());
        assert!(check_value(12.75).is_ok());

        let err = check_value(20.5).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error.to_string(), "Grade must be between 0 and 20");

        assert!(check_value(-1.0).is_err());
        assert!(check_value(f64::NAN).is_err());
    }

    #[test]
    fn test_check_coefficient() {
        assert!(check_coefficient(1).is_ok());
        assert!(check_coefficient(5).is_ok());

        let err = check_coefficient(0).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error.to_string(), "Coefficient must be at least 1");
    }

    #[test]
    fn test_parse_grade_type() {
        assert_eq!(parse_grade_type(None).unwrap(), None);
        assert_eq!(
            parse_grade_type(Some("Project")).unwrap(),
            Some(GradeType::Project)
        );

        let err = parse_grade_type(Some("homework")).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.error.to_string(),
            "Grade type must be one of: exam, assignment, participation, project"
        );
    }
}
