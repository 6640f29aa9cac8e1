use anyhow::Context;
use gradebook_auth::create_access_token;
use gradebook_config::JwtConfig;
use gradebook_core::{AppError, hash_password, verify_password};
use gradebook_models::{UserCredentials, UserId, UserRole};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::{BusinessEvent, record};

use super::model::{LoginRequest, LoginResponse, RegisterRequestDto, User};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// bcrypt is CPU bound, keep it off the async workers.
async fn off_runtime<T, F>(job: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(AppError::internal)?
}

pub struct AuthService;

impl AuthService {
    /// Self-registration is open to students and teachers only.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let role = dto.role.unwrap_or(UserRole::Student);
        if role == UserRole::Admin {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Role must be one of: student, teacher"
            )));
        }

        let password = dto.password.clone();
        let hashed_password = off_runtime(move || hash_password(&password)).await?;
        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (email, name, role, password)
               VALUES ($1, $2, $3, $4)
               RETURNING id, email, name, role, created_at, updated_at"#,
        )
        .bind(dto.email.trim().to_lowercase())
        .bind(name)
        .bind(role)
        .bind(&hashed_password)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Email already exists"));
            }
            AppError::database(anyhow::Error::new(e).context("Failed to create user"))
        })?;

        record(BusinessEvent::UserRegistered {
            role: user.role.as_str(),
        });

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            r#"SELECT id, email, name, role, password, created_at, updated_at
               FROM users WHERE email = $1"#,
        )
        .bind(dto.email.trim().to_lowercase())
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by email")
        .map_err(AppError::database)?;

        let Some(credentials) = credentials else {
            record(BusinessEvent::LoginFailed);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        let password = dto.password.clone();
        let stored_hash = credentials.password.clone();
        if !off_runtime(move || verify_password(&password, &stored_hash)).await? {
            record(BusinessEvent::LoginFailed);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token = create_access_token(
            credentials.id.into_inner(),
            &credentials.email,
            credentials.role.as_str(),
            jwt_config,
        )?;

        record(BusinessEvent::LoginSucceeded {
            role: credentials.role.as_str(),
        });

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            user: credentials.into(),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }
}
