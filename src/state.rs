use gradebook_config::{CorsConfig, JwtConfig, ReportConfig};
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub report_config: ReportConfig,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = gradebook_db::init_db_pool().await?;
    gradebook_db::run_migrations(&db).await?;

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        report_config: ReportConfig::from_env(),
    })
}
