//! Role-based route guards.
//!
//! Guards are plain axum middleware functions meant for
//! `middleware::from_fn_with_state`:
//!
//! ```rust,ignore
//! Router::new()
//!     .nest("/teacher", teacher_routes)
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_teacher));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use gradebook_core::AppError;
use gradebook_models::UserRole;

use crate::metrics::{BusinessEvent, record};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Lets the request through only when the token's role is in `allowed_roles`.
///
/// The authenticated user is inserted into the request extensions.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    parts.extensions.insert(auth_user);
    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Teacher area: teachers and admins.
pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        &[UserRole::Teacher, UserRole::Admin],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Student area: students only.
pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[UserRole::Student]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    let user_role = auth_user.role()?;

    if !allowed_roles.contains(&user_role) {
        record(BusinessEvent::AccessDenied {
            role: user_role.as_str(),
        });
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {}, but user has role: {}",
            allowed_roles
                .iter()
                .map(UserRole::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            user_role
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_auth::Claims;

    fn auth_user(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "user@school.test".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_check_any_role_allows_listed_roles() {
        let allowed = [UserRole::Teacher, UserRole::Admin];
        assert!(check_any_role(&auth_user("teacher"), &allowed).is_ok());
        assert!(check_any_role(&auth_user("admin"), &allowed).is_ok());
    }

    #[test]
    fn test_check_any_role_denies_others() {
        let err = check_any_role(&auth_user("student"), &[UserRole::Teacher]).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
        assert_eq!(
            err.error.to_string(),
            "Access denied. Required roles: teacher, but user has role: student"
        );
    }

    #[test]
    fn test_check_any_role_rejects_unknown_role() {
        let err = check_any_role(&auth_user("janitor"), &[UserRole::Student]).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }
}
