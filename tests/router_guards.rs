//! Route guards that reject before touching the database.

mod common;

use axum::http::StatusCode;
use common::{send, setup_test_app, test_jwt_config};
use gradebook_auth::create_access_token;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

fn lazy_app() -> axum::Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .unwrap();
    setup_test_app(pool)
}

fn token_for(role: &str) -> String {
    create_access_token(Uuid::new_v4(), "guard@test.com", role, &test_jwt_config()).unwrap()
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = lazy_app();

    for uri in [
        "/api/teacher/dashboard",
        "/api/teacher/grades",
        "/api/student/dashboard",
        "/api/student/grades",
    ] {
        let response = send(&app, "GET", uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn test_student_token_is_rejected_by_teacher_area() {
    let app = lazy_app();
    let token = token_for("student");

    let response = send(&app, "GET", "/api/teacher/statistics", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_teacher_and_admin_tokens_are_rejected_by_student_area() {
    let app = lazy_app();

    for role in ["teacher", "admin"] {
        let token = token_for(role);
        let response = send(&app, "GET", "/api/student/statistics", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{}", role);
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = lazy_app();
    let response = send(&app, "GET", "/api/nowhere", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
