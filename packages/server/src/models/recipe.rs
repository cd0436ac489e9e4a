use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entity::recipe;
use crate::error::AppError;
use crate::models::shared::{Pagination, validate_name};
use crate::models::user::UserResponse;

/// One `{id, amount}` ingredient line in a write request.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct IngredientLineInput {
    /// Ingredient id from the reference table.
    pub id: i32,
    /// Quantity in the ingredient's measurement unit (>= 1).
    pub amount: i32,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub text: String,
    /// Cooking time in minutes (>= 1).
    pub cooking_time: i32,
    /// Base64 data URL of the dish image.
    pub image: String,
    pub ingredients: Vec<IngredientLineInput>,
}

/// Update payload. Scalar fields are optional; the ingredient list is
/// required and replaces the stored set wholesale.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    /// Base64 data URL; when present the previous image is replaced.
    pub image: Option<String>,
    pub ingredients: Vec<IngredientLineInput>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct RecipeListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Only recipes by this author.
    pub author: Option<i32>,
    /// `1` restricts to the caller's favorites (ignored for anonymous callers).
    pub is_favorited: Option<u8>,
    /// `1` restricts to the caller's cart (ignored for anonymous callers).
    pub is_in_shopping_cart: Option<u8>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct DownloadQuery {
    /// Output format: `txt` (default) or `pdf`.
    pub file_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// One aggregand of the read form: ingredient identity plus the per-recipe
/// amount from the join row.
#[derive(Serialize, utoipa::ToSchema)]
pub struct IngredientLineResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub name: String,
    pub author: UserResponse,
    pub ingredients: Vec<IngredientLineResponse>,
    /// Whether the calling user has favorited this recipe.
    pub is_favorited: bool,
    /// Whether this recipe is in the calling user's cart.
    pub is_in_shopping_cart: bool,
    /// Absolute URL of the dish image.
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Compact form returned by relation toggles and subscription previews.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ShortRecipeResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl ShortRecipeResponse {
    pub fn from_model(model: &recipe::Model, base_url: &str) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            image: format!("{base_url}/media/{}", model.image),
            cooking_time: model.cooking_time,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeListResponse {
    pub data: Vec<RecipeResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Shared checks for the ingredient list of a write request.
pub fn validate_ingredient_lines(lines: &[IngredientLineInput]) -> Result<(), AppError> {
    if lines.is_empty() {
        return Err(AppError::Validation(
            "Ingredients must not be empty".into(),
        ));
    }
    let mut seen = HashSet::new();
    for line in lines {
        if !seen.insert(line.id) {
            return Err(AppError::Validation(format!(
                "Duplicate ingredient id {} in recipe",
                line.id
            )));
        }
        if line.amount < 1 {
            return Err(AppError::Validation(format!(
                "Amount for ingredient {} must be >= 1",
                line.id
            )));
        }
    }
    Ok(())
}

pub fn validate_create_recipe(payload: &CreateRecipeRequest) -> Result<(), AppError> {
    validate_name(&payload.name, "Name")?;
    if payload.text.trim().is_empty() {
        return Err(AppError::Validation("Text must not be empty".into()));
    }
    if payload.cooking_time < 1 {
        return Err(AppError::Validation("Cooking time must be >= 1".into()));
    }
    if payload.image.trim().is_empty() {
        return Err(AppError::Validation("Image must not be empty".into()));
    }
    validate_ingredient_lines(&payload.ingredients)
}

pub fn validate_update_recipe(payload: &UpdateRecipeRequest) -> Result<(), AppError> {
    if let Some(ref name) = payload.name {
        validate_name(name, "Name")?;
    }
    if let Some(ref text) = payload.text
        && text.trim().is_empty()
    {
        return Err(AppError::Validation("Text must not be empty".into()));
    }
    if let Some(time) = payload.cooking_time
        && time < 1
    {
        return Err(AppError::Validation("Cooking time must be >= 1".into()));
    }
    validate_ingredient_lines(&payload.ingredients)
}
