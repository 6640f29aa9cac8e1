//! User entity, roles and registration/login DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

/// Role of a user. Stored as the postgres enum `user_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            "student" => Ok(UserRole::Student),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The name when set, the email otherwise.
    pub fn display_name(&self) -> &str {
        display_name(self.name.as_deref(), &self.email)
    }
}

pub fn display_name<'a>(name: Option<&'a str>, email: &'a str) -> &'a str {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => email,
    }
}

/// A user row including the password hash. Never serialized.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserCredentials> for User {
    fn from(row: UserCredentials) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(
        email(message = "Invalid email address"),
        length(max = 180, message = "Email must be at most 180 characters")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
    /// `student` or `teacher`; defaults to `student`
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        for role in [UserRole::Admin, UserRole::Teacher, UserRole::Student] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
            assert_eq!(role.to_string(), role.as_str());
        }
        assert!("system_admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(display_name(Some("Alice Martin"), "a@school.test"), "Alice Martin");
        assert_eq!(display_name(None, "a@school.test"), "a@school.test");
        assert_eq!(display_name(Some("  "), "a@school.test"), "a@school.test");
    }

    #[test]
    fn test_register_validation() {
        let dto = RegisterRequestDto {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            name: None,
            role: None,
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
