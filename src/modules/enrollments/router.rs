use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{available_courses, drop_enrollment, enroll, student_dashboard};

/// Mounted under `/student`.
pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(student_dashboard))
        .route("/enrollments/available", get(available_courses))
        .route(
            "/enrollments/{course_id}",
            post(enroll).delete(drop_enrollment),
        )
}
