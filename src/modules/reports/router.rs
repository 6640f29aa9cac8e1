use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    download_bulletin, download_course_report, view_bulletin, view_course_report,
};

/// Mounted under `/teacher`.
pub fn init_teacher_reports_router() -> Router<AppState> {
    Router::new()
        .route("/reports/courses/{id}", get(download_course_report))
        .route("/reports/courses/{id}/view", get(view_course_report))
}

/// Mounted under `/student`.
pub fn init_student_reports_router() -> Router<AppState> {
    Router::new()
        .route("/reports/bulletins/{course_id}", get(download_bulletin))
        .route("/reports/bulletins/{course_id}/view", get(view_bulletin))
}
