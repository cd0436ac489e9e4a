use std::collections::{HashMap, HashSet};

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect};
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{favorite, ingredient, recipe, recipe_ingredient, shopping_cart, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, OptionalAuthUser};
use crate::extractors::json::AppJson;
use crate::models::recipe::*;
use crate::models::shared::Pagination;
use crate::models::user::UserResponse;
use crate::shopping_list::{self, Format};
use crate::state::AppState;
use crate::utils::image;

async fn find_recipe(db: &impl ConnectionTrait, id: i32) -> Result<recipe::Model, AppError> {
    recipe::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}

/// Every ingredient id in `lines` must exist in the reference table.
async fn check_ingredients_exist(
    db: &impl ConnectionTrait,
    lines: &[IngredientLineInput],
) -> Result<(), AppError> {
    let ids: Vec<i32> = lines.iter().map(|l| l.id).collect();
    let known: HashSet<i32> = ingredient::Entity::find()
        .filter(ingredient::Column::Id.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();
    let missing: Vec<String> = ids
        .iter()
        .filter(|id| !known.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Unknown ingredient id(s): {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

async fn insert_ingredient_lines(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    lines: &[IngredientLineInput],
) -> Result<(), AppError> {
    let rows = lines.iter().map(|l| recipe_ingredient::ActiveModel {
        recipe_id: Set(recipe_id),
        ingredient_id: Set(l.id),
        amount: Set(l.amount),
    });
    recipe_ingredient::Entity::insert_many(rows).exec(txn).await?;
    Ok(())
}

/// Assemble full read forms for a page of recipes, resolving per-recipe
/// ingredient lines and the caller-relative flags in batched queries.
async fn recipe_responses(
    db: &DatabaseConnection,
    base_url: &str,
    viewer: Option<i32>,
    recipes_with_authors: Vec<(recipe::Model, Option<user::Model>)>,
) -> Result<Vec<RecipeResponse>, AppError> {
    let recipe_ids: Vec<i32> = recipes_with_authors.iter().map(|(r, _)| r.id).collect();
    let author_ids: Vec<i32> = recipes_with_authors
        .iter()
        .map(|(r, _)| r.author_id)
        .collect();

    let joined = recipe_ingredient::Entity::find()
        .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.clone()))
        .find_also_related(ingredient::Entity)
        .all(db)
        .await?;
    let mut lines: HashMap<i32, Vec<IngredientLineResponse>> = HashMap::new();
    for (row, ing) in joined {
        let ing = ing.ok_or_else(|| {
            AppError::Internal(format!(
                "recipe_ingredient ({}, {}) references a missing ingredient",
                row.recipe_id, row.ingredient_id
            ))
        })?;
        lines.entry(row.recipe_id).or_default().push(IngredientLineResponse {
            id: ing.id,
            name: ing.name,
            measurement_unit: ing.measurement_unit,
            amount: row.amount,
        });
    }

    let (favorited, in_cart, followed) = match viewer {
        Some(viewer) => {
            let favorited: HashSet<i32> = favorite::Entity::find()
                .filter(favorite::Column::UserId.eq(viewer))
                .filter(favorite::Column::RecipeId.is_in(recipe_ids.clone()))
                .all(db)
                .await?
                .into_iter()
                .map(|r| r.recipe_id)
                .collect();
            let in_cart: HashSet<i32> = shopping_cart::Entity::find()
                .filter(shopping_cart::Column::UserId.eq(viewer))
                .filter(shopping_cart::Column::RecipeId.is_in(recipe_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|r| r.recipe_id)
                .collect();
            let followed: HashSet<i32> = crate::entity::subscription::Entity::find()
                .filter(crate::entity::subscription::Column::UserId.eq(viewer))
                .filter(crate::entity::subscription::Column::AuthorId.is_in(author_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|r| r.author_id)
                .collect();
            (favorited, in_cart, followed)
        }
        None => Default::default(),
    };

    let mut data = Vec::with_capacity(recipes_with_authors.len());
    for (model, author) in recipes_with_authors {
        let author = author.ok_or_else(|| {
            AppError::Internal(format!("recipe {} references a missing author", model.id))
        })?;
        let is_subscribed = followed.contains(&author.id);
        data.push(RecipeResponse {
            id: model.id,
            name: model.name,
            author: UserResponse::from_model(author, base_url, is_subscribed),
            ingredients: lines.remove(&model.id).unwrap_or_default(),
            is_favorited: favorited.contains(&model.id),
            is_in_shopping_cart: in_cart.contains(&model.id),
            image: format!("{base_url}/media/{}", model.image),
            text: model.text,
            cooking_time: model.cooking_time,
            created_at: model.created_at,
        });
    }
    Ok(data)
}

async fn single_recipe_response(
    state: &AppState,
    viewer: Option<i32>,
    id: i32,
) -> Result<RecipeResponse, AppError> {
    let pair = recipe::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))?;
    let mut responses = recipe_responses(
        &state.db,
        &state.config.server.base_url,
        viewer,
        vec![pair],
    )
    .await?;
    responses
        .pop()
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    tag = "Recipes",
    operation_id = "listRecipes",
    summary = "List recipes",
    description = "Paginated, newest first. `is_favorited=1` and `is_in_shopping_cart=1` \
                   restrict to the caller's favorites/cart and are ignored for anonymous callers.",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Paginated recipe list", body = RecipeListResponse),
    ),
)]
#[instrument(skip(state, viewer, query))]
pub async fn list_recipes(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<RecipeListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let viewer_id = viewer.as_ref().map(|v| v.user_id);

    let mut select = recipe::Entity::find();

    if let Some(author) = query.author {
        select = select.filter(recipe::Column::AuthorId.eq(author));
    }
    if let Some(viewer_id) = viewer_id {
        if query.is_favorited == Some(1) {
            select = select.filter(
                recipe::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(favorite::Column::RecipeId)
                        .from(favorite::Entity)
                        .and_where(favorite::Column::UserId.eq(viewer_id))
                        .to_owned(),
                ),
            );
        }
        if query.is_in_shopping_cart == Some(1) {
            select = select.filter(
                recipe::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(shopping_cart::Column::RecipeId)
                        .from(shopping_cart::Entity)
                        .and_where(shopping_cart::Column::UserId.eq(viewer_id))
                        .to_owned(),
                ),
            );
        }
    }

    let total = select.clone().paginate(&state.db, per_page).num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let pairs = select
        .order_by_desc(recipe::Column::CreatedAt)
        .order_by_desc(recipe::Column::Id)
        .offset(Some((page - 1).saturating_mul(per_page)))
        .limit(Some(per_page))
        .find_also_related(user::Entity)
        .all(&state.db)
        .await?;

    let data =
        recipe_responses(&state.db, &state.config.server.base_url, viewer_id, pairs).await?;

    Ok(Json(RecipeListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    tag = "Recipes",
    operation_id = "createRecipe",
    summary = "Create a recipe",
    description = "The recipe row and its ingredient lines are written in one transaction.",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, name = %payload.name))]
pub async fn create_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_recipe(&payload)?;

    let decoded =
        image::decode_data_url(&payload.image).map_err(|e| AppError::Validation(e.message()))?;

    let txn = state.db.begin().await?;
    check_ingredients_exist(&txn, &payload.ingredients).await?;

    let stored = image::store(&state.config.media.root, "recipes", &decoded)
        .await
        .map_err(|e| AppError::Internal(format!("Image write error: {}", e)))?;

    let new_recipe = recipe::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        author_id: Set(auth_user.user_id),
        text: Set(payload.text),
        image: Set(stored),
        cooking_time: Set(payload.cooking_time),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_recipe.insert(&txn).await?;
    insert_ingredient_lines(&txn, model.id, &payload.ingredients).await?;
    txn.commit().await?;

    let body = single_recipe_response(&state, Some(auth_user.user_id), model.id).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    tag = "Recipes",
    operation_id = "getRecipe",
    summary = "Get a recipe",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Unknown recipe (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer))]
pub async fn get_recipe(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, AppError> {
    let body = single_recipe_response(&state, viewer.as_ref().map(|v| v.user_id), id).await?;
    Ok(Json(body))
}

#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    tag = "Recipes",
    operation_id = "updateRecipe",
    summary = "Update a recipe (owner only)",
    description = "Ingredient lines are replaced wholesale inside one transaction; \
                   there is no merge.",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown recipe (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, recipe_id = id))]
pub async fn update_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    validate_update_recipe(&payload)?;

    let txn = state.db.begin().await?;
    let model = find_recipe(&txn, id).await?;
    if model.author_id != auth_user.user_id {
        return Err(AppError::PermissionDenied);
    }
    check_ingredients_exist(&txn, &payload.ingredients).await?;

    let previous_image = model.image.clone();
    let mut new_image = None;
    if let Some(ref data_url) = payload.image {
        let decoded =
            image::decode_data_url(data_url).map_err(|e| AppError::Validation(e.message()))?;
        let stored = image::store(&state.config.media.root, "recipes", &decoded)
            .await
            .map_err(|e| AppError::Internal(format!("Image write error: {}", e)))?;
        new_image = Some(stored);
    }

    let mut active: recipe::ActiveModel = model.into();
    if let Some(name) = payload.name.as_deref() {
        active.name = Set(name.trim().to_string());
    }
    if let Some(text) = payload.text.clone() {
        active.text = Set(text);
    }
    if let Some(time) = payload.cooking_time {
        active.cooking_time = Set(time);
    }
    if let Some(ref stored) = new_image {
        active.image = Set(stored.clone());
    }
    active.update(&txn).await?;

    // Transactional replace of the join rows: delete-all then insert-all.
    recipe_ingredient::Entity::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(id))
        .exec(&txn)
        .await?;
    insert_ingredient_lines(&txn, id, &payload.ingredients).await?;
    txn.commit().await?;

    if new_image.is_some() {
        image::remove(&state.config.media.root, &previous_image).await;
    }

    let body = single_recipe_response(&state, Some(auth_user.user_id), id).await?;
    Ok(Json(body))
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    tag = "Recipes",
    operation_id = "deleteRecipe",
    summary = "Delete a recipe (owner only)",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown recipe (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, recipe_id = id))]
pub async fn delete_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let model = find_recipe(&txn, id).await?;
    if model.author_id != auth_user.user_id {
        return Err(AppError::PermissionDenied);
    }

    // Relation rows are jointly owned and go with the recipe.
    recipe_ingredient::Entity::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(id))
        .exec(&txn)
        .await?;
    favorite::Entity::delete_many()
        .filter(favorite::Column::RecipeId.eq(id))
        .exec(&txn)
        .await?;
    shopping_cart::Entity::delete_many()
        .filter(shopping_cart::Column::RecipeId.eq(id))
        .exec(&txn)
        .await?;
    let image_path = model.image.clone();
    let active: recipe::ActiveModel = model.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    image::remove(&state.config.media.root, &image_path).await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}/get-link",
    tag = "Recipes",
    operation_id = "getRecipeShortLink",
    summary = "Get a short link for a recipe",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkResponse),
        (status = 404, description = "Unknown recipe (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_short_link(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ShortLinkResponse>, AppError> {
    find_recipe(&state.db, id).await?;
    Ok(Json(ShortLinkResponse {
        short_link: format!("{}/s/{}", state.config.server.base_url, id),
    }))
}

/// Resolver for the links handed out by [`get_short_link`]. Mounted at the
/// root (`/s/{id}`), outside the versioned API prefix.
#[instrument(skip(state))]
pub async fn resolve_short_link(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    find_recipe(&state.db, id).await?;
    Ok(Redirect::to(&format!("/api/v1/recipes/{id}")))
}

// ---------------------------------------------------------------------------
// Relation toggles
// ---------------------------------------------------------------------------

/// Which user-recipe collection a toggle operates on. Favorite and cart
/// rows behave identically; only the table differs.
#[derive(Clone, Copy)]
enum RecipeRelation {
    Favorite,
    Cart,
}

impl RecipeRelation {
    fn collection(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::Cart => "shopping cart",
        }
    }
}

async fn add_recipe_relation(
    state: &AppState,
    kind: RecipeRelation,
    user_id: i32,
    recipe_id: i32,
) -> Result<ShortRecipeResponse, AppError> {
    let model = find_recipe(&state.db, recipe_id).await?;

    let exists = match kind {
        RecipeRelation::Favorite => favorite::Entity::find_by_id((user_id, recipe_id))
            .one(&state.db)
            .await?
            .is_some(),
        RecipeRelation::Cart => shopping_cart::Entity::find_by_id((user_id, recipe_id))
            .one(&state.db)
            .await?
            .is_some(),
    };
    let duplicate = || {
        AppError::Conflict(format!(
            "Recipe '{}' is already in {}",
            model.name,
            kind.collection()
        ))
    };
    if exists {
        return Err(duplicate());
    }

    let now = chrono::Utc::now();
    let insert = match kind {
        RecipeRelation::Favorite => {
            favorite::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                created_at: Set(now),
            }
            .insert(&state.db)
            .await
            .map(|_| ())
        }
        RecipeRelation::Cart => {
            shopping_cart::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                created_at: Set(now),
            }
            .insert(&state.db)
            .await
            .map(|_| ())
        }
    };
    match insert {
        Ok(()) => {}
        // Racing identical adds: the composite key decides, the loser
        // reports the duplicate.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(duplicate());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(ShortRecipeResponse::from_model(
        &model,
        &state.config.server.base_url,
    ))
}

async fn remove_recipe_relation(
    state: &AppState,
    kind: RecipeRelation,
    user_id: i32,
    recipe_id: i32,
) -> Result<(), AppError> {
    find_recipe(&state.db, recipe_id).await?;

    let not_found = || {
        AppError::NotFound(format!("Recipe not found in {}", kind.collection()))
    };
    match kind {
        RecipeRelation::Favorite => {
            let row = favorite::Entity::find_by_id((user_id, recipe_id))
                .one(&state.db)
                .await?
                .ok_or_else(not_found)?;
            let active: favorite::ActiveModel = row.into();
            active.delete(&state.db).await?;
        }
        RecipeRelation::Cart => {
            let row = shopping_cart::Entity::find_by_id((user_id, recipe_id))
                .one(&state.db)
                .await?
                .ok_or_else(not_found)?;
            let active: shopping_cart::ActiveModel = row.into();
            active.delete(&state.db).await?;
        }
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/favorite",
    tag = "Recipes",
    operation_id = "addFavorite",
    summary = "Add a recipe to favorites",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Added", body = ShortRecipeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown recipe (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already favorited (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, recipe_id = id))]
pub async fn add_favorite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let body = add_recipe_relation(&state, RecipeRelation::Favorite, auth_user.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/favorite",
    tag = "Recipes",
    operation_id = "removeFavorite",
    summary = "Remove a recipe from favorites",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not in favorites or unknown recipe (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, recipe_id = id))]
pub async fn remove_favorite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    remove_recipe_relation(&state, RecipeRelation::Favorite, auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/shopping_cart",
    tag = "Recipes",
    operation_id = "addToCart",
    summary = "Add a recipe to the shopping cart",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Added", body = ShortRecipeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown recipe (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already in cart (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, recipe_id = id))]
pub async fn add_to_cart(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let body = add_recipe_relation(&state, RecipeRelation::Cart, auth_user.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/shopping_cart",
    tag = "Recipes",
    operation_id = "removeFromCart",
    summary = "Remove a recipe from the shopping cart",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not in cart or unknown recipe (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, recipe_id = id))]
pub async fn remove_from_cart(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    remove_recipe_relation(&state, RecipeRelation::Cart, auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shopping-list export
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/recipes/download_shopping_cart",
    tag = "Recipes",
    operation_id = "downloadShoppingCart",
    summary = "Export the caller's aggregated shopping list",
    description = "Aggregates ingredient quantities across every recipe in the cart and \
                   returns a downloadable document. `file_type` selects `txt` (default) or `pdf`.",
    params(DownloadQuery),
    responses(
        (status = 200, description = "Document attachment"),
        (status = 400, description = "Empty cart or bad file_type (EMPTY_CART, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn download_shopping_cart(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let format = Format::parse(query.file_type.as_deref())?;
    let list = shopping_list::collect(&state.db, auth_user.user_id).await?;

    let (bytes, content_type, filename) = match format {
        Format::Txt => (
            shopping_list::text::render(&list).into_bytes(),
            "text/plain; charset=utf-8",
            "shopping_cart.txt",
        ),
        Format::Pdf => (
            shopping_list::pdf::render(&list)?,
            "application/pdf",
            "shopping_cart.pdf",
        ),
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
