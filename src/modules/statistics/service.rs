use anyhow::Context;
use gradebook_core::AppError;
use gradebook_models::{CourseId, Grade, StudentAggregate, UserId};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::grades::service::GradeService;

use super::calculator;
use super::model::{
    AveragesByType, ClassStatistics, CourseStatistics, DistributionBucket, RankingEntry,
    RankingPosition, StudentProgress,
};

pub struct StatisticsService;

impl StatisticsService {
    #[instrument(skip(db))]
    pub async fn average_for_student_in_course(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<f64, AppError> {
        let grades = GradeService::grades_by_student_and_course(db, student_id, course_id).await?;
        Ok(calculator::weighted_average(&grades))
    }

    /// Weighted average over every grade of the student, all courses mixed.
    #[instrument(skip(db))]
    pub async fn overall_average(db: &PgPool, student_id: UserId) -> Result<f64, AppError> {
        let grades = GradeService::grades_by_student(db, student_id).await?;
        Ok(calculator::weighted_average(&grades))
    }

    /// Every enrolled student, grades or not.
    #[instrument(skip(db))]
    pub async fn course_ranking(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<Vec<RankingEntry>, AppError> {
        let aggregates = sqlx::query_as::<_, StudentAggregate>(
            r#"SELECT
                u.id AS student_id,
                u.name,
                u.email,
                SUM(g.value * g.coefficient) AS weighted_sum,
                SUM(g.coefficient)::bigint AS coefficient_sum,
                COUNT(g.id) AS grade_count
               FROM enrollments e
               JOIN users u ON u.id = e.student_id
               LEFT JOIN grades g ON g.student_id = e.student_id AND g.course_id = e.course_id
               WHERE e.course_id = $1
               GROUP BY u.id, u.name, u.email"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Failed to aggregate course grades")
        .map_err(AppError::database)?;

        Ok(calculator::rank_students(aggregates))
    }

    #[instrument(skip(db))]
    pub async fn student_ranking_position(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<RankingPosition>, AppError> {
        let ranking = Self::course_ranking(db, course_id).await?;
        Ok(calculator::position_of(&ranking, student_id))
    }

    #[instrument(skip(db))]
    pub async fn averages_by_type(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<AveragesByType, AppError> {
        let grades = GradeService::grades_by_student_and_course(db, student_id, course_id).await?;
        Ok(calculator::averages_by_type(&grades))
    }

    #[instrument(skip(db))]
    pub async fn class_statistics(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<ClassStatistics, AppError> {
        let grades = Self::course_grades(db, course_id).await?;
        Ok(calculator::class_statistics(&grades))
    }

    #[instrument(skip(db))]
    pub async fn grade_distribution(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<Vec<DistributionBucket>, AppError> {
        let grades = Self::course_grades(db, course_id).await?;
        Ok(calculator::grade_distribution(&grades))
    }

    #[instrument(skip(db))]
    pub async fn student_progress(
        db: &PgPool,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<StudentProgress, AppError> {
        let grades = GradeService::grades_by_student_and_course(db, student_id, course_id).await?;
        Ok(calculator::student_progress(&grades))
    }

    /// Ranking, class statistics and distribution of one course in one pass
    /// over its grades.
    #[instrument(skip(db))]
    pub async fn recalculate_all(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<CourseStatistics, AppError> {
        let ranking = Self::course_ranking(db, course_id).await?;
        let grades = Self::course_grades(db, course_id).await?;

        Ok(CourseStatistics {
            ranking,
            statistics: calculator::class_statistics(&grades),
            distribution: calculator::grade_distribution(&grades),
        })
    }

    async fn course_grades(db: &PgPool, course_id: CourseId) -> Result<Vec<Grade>, AppError> {
        sqlx::query_as::<_, Grade>(
            r#"SELECT id, student_id, course_id, value, grade_type, coefficient, created_at
               FROM grades WHERE course_id = $1"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch course grades")
        .map_err(AppError::database)
    }
}
