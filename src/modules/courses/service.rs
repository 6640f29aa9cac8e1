use anyhow::Context;
use gradebook_core::AppError;
use gradebook_models::{CourseId, UserId};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::{BusinessEvent, record};

use super::model::{Course, CourseSummary, CreateCourseDto, UpdateCourseDto};

const COURSE_COLUMNS: &str = "id, title, description, teacher_id, created_at, updated_at";

/// Course listing with owner display name and enrollment count.
/// Filters and ordering are supplied through [`summary_query`].
const SUMMARY_SELECT: &str = r#"SELECT
        c.id,
        c.title,
        c.description,
        c.teacher_id,
        COALESCE(NULLIF(TRIM(u.name), ''), u.email) AS teacher_name,
        COUNT(e.id) AS enrollment_count,
        c.created_at
    FROM courses c
    JOIN users u ON u.id = c.teacher_id
    LEFT JOIN enrollments e ON e.course_id = c.id"#;

fn summary_query(filter: &str, order: &str) -> String {
    format!(
        "{SUMMARY_SELECT} {filter} GROUP BY c.id, u.name, u.email ORDER BY {order}"
    )
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto))]
    pub async fn create_course(
        db: &PgPool,
        teacher_id: UserId,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (title, description, teacher_id) VALUES ($1, $2, $3) RETURNING {COURSE_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .context("Failed to create course")
        .map_err(AppError::database)?;

        record(BusinessEvent::CourseCreated);

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, course_id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(course_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch course")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_course_summary(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<CourseSummary, AppError> {
        sqlx::query_as::<_, CourseSummary>(&summary_query("WHERE c.id = $1", "c.title"))
            .bind(course_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch course")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    /// Only the fields present in `dto` are changed.
    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        course_id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            r#"UPDATE courses
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(course_id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .fetch_optional(db)
        .await
        .context("Failed to update course")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    /// Enrollments and grades go with the course.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, course_id: CourseId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(db)
            .await
            .context("Failed to delete course")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn find_by_teacher(
        db: &PgPool,
        teacher_id: UserId,
    ) -> Result<Vec<CourseSummary>, AppError> {
        sqlx::query_as::<_, CourseSummary>(&summary_query("WHERE c.teacher_id = $1", "c.title"))
            .bind(teacher_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch teacher courses")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn find_all(db: &PgPool) -> Result<Vec<CourseSummary>, AppError> {
        sqlx::query_as::<_, CourseSummary>(&summary_query("", "c.title"))
            .fetch_all(db)
            .await
            .context("Failed to fetch courses")
            .map_err(AppError::database)
    }

    /// Courses visible in the teacher area: everything for admins, owned
    /// courses otherwise.
    pub async fn find_managed_by(
        db: &PgPool,
        user_id: UserId,
        is_admin: bool,
    ) -> Result<Vec<CourseSummary>, AppError> {
        if is_admin {
            Self::find_all(db).await
        } else {
            Self::find_by_teacher(db, user_id).await
        }
    }

    #[instrument(skip(db))]
    pub async fn find_courses_for_student(
        db: &PgPool,
        student_id: UserId,
    ) -> Result<Vec<CourseSummary>, AppError> {
        sqlx::query_as::<_, CourseSummary>(&summary_query(
            "WHERE c.id IN (SELECT course_id FROM enrollments WHERE student_id = $1)",
            "c.title",
        ))
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student courses")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn find_available_for_student(
        db: &PgPool,
        student_id: UserId,
    ) -> Result<Vec<CourseSummary>, AppError> {
        sqlx::query_as::<_, CourseSummary>(&summary_query(
            "WHERE c.id NOT IN (SELECT course_id FROM enrollments WHERE student_id = $1)",
            "c.title",
        ))
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch available courses")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn find_recent(db: &PgPool, limit: i64) -> Result<Vec<CourseSummary>, AppError> {
        let sql = format!(
            "{} LIMIT $1",
            summary_query("", "c.created_at DESC, c.title")
        );
        sqlx::query_as::<_, CourseSummary>(&sql)
            .bind(limit)
            .fetch_all(db)
            .await
            .context("Failed to fetch recent courses")
            .map_err(AppError::database)
    }

    pub async fn count(db: &PgPool) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await
            .context("Failed to count courses")
            .map_err(AppError::database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_query_groups_before_ordering() {
        let sql = summary_query("WHERE c.teacher_id = $1", "c.title");
        let where_at = sql.find("WHERE c.teacher_id").unwrap();
        let group_at = sql.find("GROUP BY").unwrap();
        let order_at = sql.find("ORDER BY c.title").unwrap();
        assert!(where_at < group_at && group_at < order_at);
    }
}
