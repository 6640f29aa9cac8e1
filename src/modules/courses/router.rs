use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    course_enrollments, create_course, delete_course, list_my_courses, show_course,
    teacher_dashboard, update_course,
};

/// Mounted under `/teacher`.
pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(teacher_dashboard))
        .route("/courses", get(list_my_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(show_course).put(update_course).delete(delete_course),
        )
        .route("/courses/{id}/enrollments", get(course_enrollments))
}
