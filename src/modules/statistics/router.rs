use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    course_grades, course_statistics, my_grades, my_statistics, statistics_index,
};

/// Mounted under `/teacher`.
pub fn init_teacher_statistics_router() -> Router<AppState> {
    Router::new()
        .route("/statistics", get(statistics_index))
        .route("/statistics/courses/{course_id}", get(course_statistics))
}

/// Mounted under `/student`.
pub fn init_student_statistics_router() -> Router<AppState> {
    Router::new()
        .route("/grades", get(my_grades))
        .route("/grades/courses/{course_id}", get(course_grades))
        .route("/statistics", get(my_statistics))
}
