mod common;

use axum::http::StatusCode;
use common::{
    create_test_course, create_test_user, enroll_student, get_auth_token, insert_grade,
    read_json, send, setup_test_app,
};
use gradebook_models::UserRole;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_and_dashboard(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "Prof").await;
    let student = create_test_user(&pool, UserRole::Student, "Stu").await;
    let course_id = create_test_course(&pool, &teacher, "Spanish").await;

    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &student.email).await;

    let response = send(
        &app,
        "POST",
        &format!("/api/student/enrollments/{}", course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["course_id"], course_id.to_string());
    assert_eq!(body["student_id"], student.id.to_string());

    let response = send(&app, "GET", "/api/student/dashboard", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["enrollments"][0]["course_title"], "Spanish");
    assert_eq!(body["enrollments"][0]["teacher_name"], "Prof");
    assert_eq!(body["courses"][0]["enrollment_count"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_twice_is_rejected(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "T").await;
    let student = create_test_user(&pool, UserRole::Student, "S").await;
    let course_id = create_test_course(&pool, &teacher, "French").await;
    enroll_student(&pool, &student, course_id).await;

    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &student.email).await;

    let response = send(
        &app,
        "POST",
        &format!("/api/student/enrollments/{}", course_id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["error"],
        "Student is already enrolled in this course"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_unknown_course(pool: PgPool) {
    let student = create_test_user(&pool, UserRole::Student, "S").await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &student.email).await;

    let response = send(
        &app,
        "POST",
        &format!("/api/student/enrollments/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_available_courses_exclude_enrolled(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "T").await;
    let student = create_test_user(&pool, UserRole::Student, "S").await;
    let taken = create_test_course(&pool, &teacher, "Statistics").await;
    create_test_course(&pool, &teacher, "Literature").await;
    enroll_student(&pool, &student, taken).await;

    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &student.email).await;

    let response = send(
        &app,
        "GET",
        "/api/student/enrollments/available",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let courses = body.as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Literature");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_drop_keeps_grades(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "T").await;
    let student = create_test_user(&pool, UserRole::Student, "S").await;
    let course_id = create_test_course(&pool, &teacher, "Psychology").await;
    enroll_student(&pool, &student, course_id).await;
    insert_grade(&pool, &student, course_id, 15.0, "exam", 2).await;

    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &student.email).await;
    let uri = format!("/api/student/enrollments/{}", course_id);

    let response = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let grades: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grades WHERE student_id = $1")
        .bind(student.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(grades, 1);

    let response = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_use_student_area(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "T").await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &teacher.email).await;

    let response = send(&app, "GET", "/api/student/dashboard", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
