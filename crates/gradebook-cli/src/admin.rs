use gradebook_core::hash_password;
use gradebook_models::{UserId, UserRole};
use sqlx::PgPool;

/// Inserts an admin account. Fails when the email is taken.
pub async fn create_admin(
    db: &PgPool,
    email: &str,
    name: Option<&str>,
    password: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (email, name, role, password)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(email.trim().to_lowercase())
    .bind(name.map(str::trim).filter(|n| !n.is_empty()))
    .bind(UserRole::Admin)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| format!("A user with email {} already exists", email).into())
}
