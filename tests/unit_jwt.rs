use gradebook_auth::{create_access_token, verify_token};
use gradebook_config::JwtConfig;
use gradebook_models::UserRole;
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_all_roles() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for role in [UserRole::Admin, UserRole::Teacher, UserRole::Student] {
        let token =
            create_access_token(user_id, "test@example.com", role.as_str(), &jwt_config).unwrap();
        assert!(!token.is_empty());
    }
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "teacher1@school.test", "teacher", &jwt_config)
        .unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.email, "teacher1@school.test");
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.role, "teacher");
    assert_eq!(claims.exp, claims.iat + 3600);
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = get_test_jwt_config();
    let err = verify_token("invalid.token.here", &jwt_config).unwrap_err();
    assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "test@example.com", "student", &jwt_config).unwrap();

    let other = JwtConfig {
        secret: "another_secret".to_string(),
        access_token_expiry: 3600,
    };

    assert!(verify_token(&token, &other).is_err());
}
