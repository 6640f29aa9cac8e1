mod common;

use axum::http::{StatusCode, header};
use common::{
    TestUser, create_test_course, create_test_user, enroll_student, get_auth_token, insert_grade,
    read_bytes, read_json, send, setup_test_app,
};
use gradebook_models::{CourseId, UserRole};
use sqlx::PgPool;

struct Classroom {
    teacher: TestUser,
    alice: TestUser,
    bob: TestUser,
    idle: TestUser,
    course_id: CourseId,
}

/// Alice: 14 (x2) and 10 (x1), weighted 12.67. Bob: 18. Idle: no grades.
async fn classroom(pool: &PgPool) -> Classroom {
    let teacher = create_test_user(pool, UserRole::Teacher, "Teacher").await;
    let alice = create_test_user(pool, UserRole::Student, "Alice").await;
    let bob = create_test_user(pool, UserRole::Student, "Bob").await;
    let idle = create_test_user(pool, UserRole::Student, "Idle").await;
    let course_id = create_test_course(pool, &teacher, "Physics").await;

    for student in [&alice, &bob, &idle] {
        enroll_student(pool, student, course_id).await;
    }
    insert_grade(pool, &alice, course_id, 14.0, "exam", 2).await;
    insert_grade(pool, &alice, course_id, 10.0, "assignment", 1).await;
    insert_grade(pool, &bob, course_id, 18.0, "exam", 1).await;

    Classroom {
        teacher,
        alice,
        bob,
        idle,
        course_id,
    }
}

fn approx(value: &serde_json::Value, expected: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < 0.01
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_statistics(pool: PgPool) {
    let c = classroom(&pool).await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &c.teacher.email).await;

    let response = send(
        &app,
        "GET",
        &format!("/api/teacher/statistics/courses/{}", c.course_id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    assert_eq!(body["course"]["title"], "Physics");

    let ranking = body["ranking"].as_array().unwrap();
    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking[0]["student_id"], c.bob.id.to_string());
    assert_eq!(ranking[0]["rank"], 1);
    assert_eq!(ranking[1]["student_id"], c.alice.id.to_string());
    assert!(approx(&ranking[1]["average"], 12.67));
    assert_eq!(ranking[2]["student_id"], c.idle.id.to_string());
    assert_eq!(ranking[2]["average"], 0.0);
    assert_eq!(ranking[2]["grade_count"], 0);

    let stats = &body["statistics"];
    assert_eq!(stats["min"], 10.0);
    assert_eq!(stats["max"], 18.0);
    assert!(approx(&stats["average"], 14.0));
    assert_eq!(stats["student_count"], 2);
    assert_eq!(stats["total_grades"], 3);

    let distribution = body["distribution"].as_array().unwrap();
    let ranges: Vec<&str> = distribution
        .iter()
        .map(|b| b["range"].as_str().unwrap())
        .collect();
    assert_eq!(
        ranges,
        vec!["Excellent (18-20)", "Good (12-14)", "Average (10-11)"]
    );
    assert!(approx(&distribution[0]["percentage"], 33.33));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_statistics_without_grades(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "T").await;
    let course_id = create_test_course(&pool, &teacher, "Empty").await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &teacher.email).await;

    let response = send(
        &app,
        "GET",
        &format!("/api/teacher/statistics/courses/{}", course_id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["statistics"]["total_grades"], 0);
    assert_eq!(body["statistics"]["average"], 0.0);
    assert!(body["distribution"].as_array().unwrap().is_empty());
    assert!(body["ranking"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_statistics_forbidden_for_other_teacher(pool: PgPool) {
    let c = classroom(&pool).await;
    let other = create_test_user(&pool, UserRole::Teacher, "Other").await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &other.email).await;

    let response = send(
        &app,
        "GET",
        &format!("/api/teacher/statistics/courses/{}", c.course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "GET", "/api/teacher/statistics", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(read_json(response).await.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_course_grades(pool: PgPool) {
    let c = classroom(&pool).await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &c.alice.email).await;

    let response = send(
        &app,
        "GET",
        &format!("/api/student/grades/courses/{}", c.course_id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["grades"].as_array().unwrap().len(), 2);
    assert!(approx(&body["average"], 12.67));
    assert_eq!(body["averages_by_type"]["exam"]["average"], 14.0);
    assert_eq!(body["averages_by_type"]["assignment"]["count"], 1);
    assert_eq!(body["progress"]["min_grade"], 10.0);
    assert_eq!(body["progress"]["max_grade"], 14.0);
    assert_eq!(body["ranking"]["rank"], 2);
    assert_eq!(body["ranking"]["total_students"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_course_grades_requires_enrollment(pool: PgPool) {
    let c = classroom(&pool).await;
    let stranger = create_test_user(&pool, UserRole::Student, "Stranger").await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &stranger.email).await;

    let response = send(
        &app,
        "GET",
        &format!("/api/student/grades/courses/{}", c.course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        "GET",
        &format!("/api/student/grades/courses/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_overview_and_statistics(pool: PgPool) {
    let c = classroom(&pool).await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &c.bob.email).await;

    let response = send(&app, "GET", "/api/student/grades", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["overall_average"], 18.0);
    assert_eq!(body["courses"][0]["grade_count"], 1);
    assert_eq!(body["courses"][0]["ranking"]["rank"], 1);

    let response = send(&app, "GET", "/api/student/statistics", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["enrollment_count"], 1);
    assert_eq!(body["courses"][0]["progress"]["total_grades"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_idle_student_has_zero_average(pool: PgPool) {
    let c = classroom(&pool).await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &c.idle.email).await;

    let response = send(&app, "GET", "/api/student/grades", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["overall_average"], 0.0);
    assert_eq!(body["courses"][0]["ranking"]["rank"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulletin_pdf(pool: PgPool) {
    let c = classroom(&pool).await;
    let stranger = create_test_user(&pool, UserRole::Student, "Stranger").await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &c.alice.email).await;

    let response = send(
        &app,
        "GET",
        &format!("/api/student/reports/bulletins/{}", c.course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment")
    );
    assert!(read_bytes(response).await.starts_with(b"%PDF"));

    let response = send(
        &app,
        "GET",
        &format!("/api/student/reports/bulletins/{}/view", c.course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("inline")
    );

    let stranger_token = get_auth_token(&app, &stranger.email).await;
    let response = send(
        &app,
        "GET",
        &format!("/api/student/reports/bulletins/{}", c.course_id),
        Some(&stranger_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_report_pdf(pool: PgPool) {
    let c = classroom(&pool).await;
    let other = create_test_user(&pool, UserRole::Teacher, "Other").await;
    let app = setup_test_app(pool);
    let token = get_auth_token(&app, &c.teacher.email).await;

    let response = send(
        &app,
        "GET",
        &format!("/api/teacher/reports/courses/{}", c.course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert!(read_bytes(response).await.starts_with(b"%PDF"));

    let other_token = get_auth_token(&app, &other.email).await;
    let response = send(
        &app,
        "GET",
        &format!("/api/teacher/reports/courses/{}/view", c.course_id),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
