use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::user::UserResponse;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique email address, used as the login identifier.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Unique handle (1-150 chars, letters, digits and `@.+-_`).
    #[schema(example = "ada_lovelace")]
    pub username: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let email = payload.email.trim();
    if email.is_empty() || email.chars().count() > 254 {
        return Err(AppError::Validation("Email must be 1-254 characters".into()));
    }
    // Coarse shape check; the unique constraint is the real gatekeeper.
    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| AppError::Validation("Email must contain '@'".into()))?;
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::Validation("Email is not a valid address".into()));
    }

    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 150 {
        return Err(AppError::Validation(
            "Username must be 1-150 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(AppError::Validation(
            "Username may contain only letters, digits and @/./+/-/_".into(),
        ));
    }

    super::shared::validate_name(&payload.first_name, "First name")?;
    super::shared::validate_name(&payload.last_name, "Last name")?;

    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Response body for successful login.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}
