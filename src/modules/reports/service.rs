use chrono::Utc;
use gradebook_config::ReportConfig;
use gradebook_core::AppError;
use gradebook_models::{CourseId, UserId, display_name};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::{BusinessEvent, record};
use crate::modules::auth::service::AuthService;
use crate::modules::courses::service::CourseService;
use crate::modules::enrollments::service::EnrollmentService;
use crate::modules::grades::service::GradeService;
use crate::modules::statistics::calculator;
use crate::modules::statistics::service::StatisticsService;

use super::pdf::{self, BulletinData, CourseReportData, CourseReportRow};

pub struct ReportService;

impl ReportService {
    /// Report card of one enrolled student in one course.
    #[instrument(skip(db, config))]
    pub async fn bulletin(
        db: &PgPool,
        config: &ReportConfig,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<u8>, AppError> {
        let course = CourseService::get_course_summary(db, course_id).await?;
        EnrollmentService::ensure_enrolled(db, student_id, course_id).await?;

        let student = AuthService::get_user(db, student_id).await?;
        let grades = GradeService::grades_by_student_and_course(db, student_id, course_id).await?;
        let average = GradeService::average_grade(db, student_id, course_id).await?;
        let ranking = StatisticsService::course_ranking(db, course_id).await?;

        let data = BulletinData {
            school_name: config.school_name.clone(),
            student_name: student.display_name().to_string(),
            student_email: student.email.clone(),
            course_title: course.title,
            teacher_name: course.teacher_name,
            grades,
            average,
            rank: calculator::position_of(&ranking, student_id),
            generated_at: Utc::now(),
        };

        let bytes = render(move || pdf::render_bulletin(&data)).await?;
        record(BusinessEvent::ReportGenerated { kind: "bulletin" });
        Ok(bytes)
    }

    /// Class overview of one course for its teacher.
    #[instrument(skip(db, config))]
    pub async fn course_report(
        db: &PgPool,
        config: &ReportConfig,
        course_id: CourseId,
    ) -> Result<Vec<u8>, AppError> {
        let course = CourseService::get_course_summary(db, course_id).await?;
        let rows = StatisticsService::course_ranking(db, course_id)
            .await?
            .into_iter()
            .map(|entry| CourseReportRow {
                student_name: display_name(entry.name.as_deref(), &entry.email).to_string(),
                grade_count: entry.grade_count,
                average: (entry.grade_count > 0).then_some(entry.average),
            })
            .collect();

        let data = CourseReportData {
            school_name: config.school_name.clone(),
            course_title: course.title,
            teacher_name: course.teacher_name,
            rows,
            statistics: StatisticsService::class_statistics(db, course_id).await?,
            distribution: StatisticsService::grade_distribution(db, course_id).await?,
            generated_at: Utc::now(),
        };

        let bytes = render(move || pdf::render_course_report(&data)).await?;
        record(BusinessEvent::ReportGenerated { kind: "course_report" });
        Ok(bytes)
    }
}

async fn render<F>(job: F) -> Result<Vec<u8>, AppError>
where
    F: FnOnce() -> anyhow::Result<Vec<u8>> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(AppError::internal)?
        .map_err(AppError::internal)
}
