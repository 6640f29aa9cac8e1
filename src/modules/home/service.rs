use anyhow::Context;
use gradebook_core::AppError;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::service::CourseService;

use super::model::HomeResponse;

const RECENT_COURSES: i64 = 6;

pub struct HomeService;

impl HomeService {
    #[instrument(skip(db))]
    pub async fn overview(db: &PgPool) -> Result<HomeResponse, AppError> {
        let total_courses = CourseService::count(db).await?;

        let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;

        let recent_courses = CourseService::find_recent(db, RECENT_COURSES).await?;

        Ok(HomeResponse {
            total_courses,
            total_users,
            recent_courses,
        })
    }
}
