use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;
use crate::models::recipe::ShortRecipeResponse;
use crate::models::shared::Pagination;

/// User profile as seen by an (optionally authenticated) caller.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Absolute URL of the avatar image, if one is set.
    pub avatar: Option<String>,
    /// Whether the calling user follows this user. Always false for
    /// anonymous callers and for the caller's own profile.
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn from_model(model: user::Model, base_url: &str, is_subscribed: bool) -> Self {
        Self {
            avatar: model
                .avatar
                .as_deref()
                .map(|path| format!("{base_url}/media/{path}")),
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            is_subscribed,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Request body for setting the current user's avatar.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetAvatarRequest {
    /// Base64 data URL, e.g. `data:image/png;base64,...`.
    pub avatar: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SetAvatarResponse {
    /// Absolute URL of the stored avatar.
    pub avatar: String,
}

/// An author the caller follows, with a preview of their recipes.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubscriptionListResponse {
    pub data: Vec<SubscriptionResponse>,
    pub pagination: Pagination,
}

/// Validate the avatar payload before attempting to decode it.
pub fn validate_set_avatar(payload: &SetAvatarRequest) -> Result<(), AppError> {
    if payload.avatar.trim().is_empty() {
        return Err(AppError::Validation("Avatar must not be empty".into()));
    }
    Ok(())
}
