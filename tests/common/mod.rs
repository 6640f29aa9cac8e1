#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use gradebook::router::init_router;
use gradebook::state::AppState;
use gradebook_config::{CorsConfig, JwtConfig, ReportConfig};
use gradebook_core::hash_password_with_cost;
use gradebook_models::{CourseId, UserId, UserRole};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "password123";

pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig::from_list("http://localhost:3000"),
        report_config: ReportConfig::default(),
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Inserts a user directly, with a cheap bcrypt cost.
pub async fn create_test_user(pool: &PgPool, role: UserRole, name: &str) -> TestUser {
    let email = generate_unique_email();
    let hashed = hash_password_with_cost(TEST_PASSWORD, 4).unwrap();

    let id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (email, name, role, password) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&email)
    .bind(name)
    .bind(role)
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email,
        name: name.to_string(),
        role,
    }
}

pub async fn create_test_course(pool: &PgPool, teacher: &TestUser, title: &str) -> CourseId {
    sqlx::query_scalar::<_, CourseId>(
        "INSERT INTO courses (title, description, teacher_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(title)
    .bind("Test course description")
    .bind(teacher.id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn enroll_student(pool: &PgPool, student: &TestUser, course_id: CourseId) {
    sqlx::query("INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2)")
        .bind(student.id)
        .bind(course_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_grade(
    pool: &PgPool,
    student: &TestUser,
    course_id: CourseId,
    value: f64,
    grade_type: &str,
    coefficient: i32,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO grades (student_id, course_id, value, grade_type, coefficient)
         VALUES ($1, $2, $3, $4::grade_type, $5)
         RETURNING id",
    )
    .bind(student.id)
    .bind(course_id)
    .bind(value)
    .bind(grade_type)
    .bind(coefficient)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn get_auth_token(app: &Router, email: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn read_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
