use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::state::AppState;

use super::controller::{
    add_grade, delete_grade, delete_student_grades, list_course_grades, list_teacher_grades,
    show_grade, update_grade,
};

/// Mounted under `/teacher`. Course paths use `{id}` like the course routes
/// they are merged with.
pub fn init_teacher_grades_router() -> Router<AppState> {
    Router::new()
        .route("/grades", get(list_teacher_grades))
        .route("/grades/{id}", put(update_grade).delete(delete_grade))
        .route(
            "/courses/{id}/grades",
            get(list_course_grades).post(add_grade),
        )
        .route(
            "/courses/{id}/students/{student_id}/grades",
            delete(delete_student_grades),
        )
}

/// Mounted under `/grades`, open to any authenticated user.
pub fn init_grade_view_router() -> Router<AppState> {
    Router::new().route("/{id}", get(show_grade))
}
