use gradebook_core::{hash_password, hash_password_with_cost, verify_password};

#[test]
fn test_hash_password_success() {
    let password = "testpassword123";
    let hash = hash_password(password).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
    assert!(hash.starts_with("$2"));
}

#[test]
fn test_verify_password_correct() {
    let hash = hash_password_with_cost("correctpassword", 4).unwrap();
    assert!(verify_password("correctpassword", &hash).unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hash = hash_password_with_cost("correctpassword", 4).unwrap();
    assert!(!verify_password("wrongpassword", &hash).unwrap());
}

#[test]
fn test_same_password_different_salts() {
    let first = hash_password_with_cost("password", 4).unwrap();
    let second = hash_password_with_cost("password", 4).unwrap();

    assert_ne!(first, second);
    assert!(verify_password("password", &first).unwrap());
    assert!(verify_password("password", &second).unwrap());
}

#[test]
fn test_verify_password_malformed_hash() {
    assert!(verify_password("password", "not-a-bcrypt-hash").is_err());
}
