use anyhow::Context;
use gradebook_core::AppError;
use gradebook_models::{CourseId, UserId};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::{BusinessEvent, record};
use crate::modules::courses::service::CourseService;

use super::model::{EnrolledStudent, Enrollment, StudentEnrollment};

const ALREADY_ENROLLED: &str = "Student is already enrolled in this course";
const NOT_ENROLLED: &str = "Student is not enrolled in this course";

pub struct EnrollmentService;

impl EnrollmentService {
    #[instrument(skip(db))]
    pub async fn enroll(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment, AppError> {
        CourseService::get_course(db, course_id).await?;

        if Self::is_enrolled(db, student_id, course_id).await? {
            return Err(AppError::bad_request(anyhow::anyhow!(ALREADY_ENROLLED)));
        }

        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"INSERT INTO enrollments (student_id, course_id)
               VALUES ($1, $2)
               RETURNING id, student_id, course_id, enrolled_at"#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(ALREADY_ENROLLED));
            }
            AppError::database(anyhow::Error::new(e).context("Failed to create enrollment"))
        })?;

        record(BusinessEvent::Enrollment { action: "enroll" });

        Ok(enrollment)
    }

    /// Removes the enrollment only; grades already given stay on record.
    #[instrument(skip(db))]
    pub async fn drop_enrollment(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<(), AppError> {
        CourseService::get_course(db, course_id).await?;

        let result = sqlx::query("DELETE FROM enrollments WHERE student_id = $1 AND course_id = $2")
            .bind(student_id)
            .bind(course_id)
            .execute(db)
            .await
            .context("Failed to delete enrollment")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(NOT_ENROLLED)));
        }

        record(BusinessEvent::Enrollment { action: "drop" });

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn is_enrolled(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = $1 AND course_id = $2)",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(db)
        .await
        .context("Failed to check enrollment")
        .map_err(AppError::database)
    }

    /// Fails with 403 unless the student is enrolled.
    pub async fn ensure_enrolled(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<(), AppError> {
        if Self::is_enrolled(db, student_id, course_id).await? {
            Ok(())
        } else {
            Err(AppError::forbidden("You are not enrolled in this course"))
        }
    }

    #[instrument(skip(db))]
    pub async fn find_by_student(
        db: &PgPool,
        student_id: UserId,
    ) -> Result<Vec<StudentEnrollment>, AppError> {
        sqlx::query_as::<_, StudentEnrollment>(
            r#"SELECT
                e.id,
                c.id AS course_id,
                c.title AS course_title,
                c.description AS course_description,
                COALESCE(NULLIF(TRIM(t.name), ''), t.email) AS teacher_name,
                e.enrolled_at
               FROM enrollments e
               JOIN courses c ON c.id = e.course_id
               JOIN users t ON t.id = c.teacher_id
               WHERE e.student_id = $1
               ORDER BY e.enrolled_at DESC"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student enrollments")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn find_by_course(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<Vec<EnrolledStudent>, AppError> {
        sqlx::query_as::<_, EnrolledStudent>(
            r#"SELECT
                e.id AS enrollment_id,
                u.id AS student_id,
                u.name,
                u.email,
                e.enrolled_at
               FROM enrollments e
               JOIN users u ON u.id = e.student_id
               WHERE e.course_id = $1
               ORDER BY e.enrolled_at DESC"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch course enrollments")
        .map_err(AppError::database)
    }
}
