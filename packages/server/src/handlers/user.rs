use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{recipe, subscription, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, OptionalAuthUser};
use crate::extractors::json::AppJson;
use crate::models::recipe::ShortRecipeResponse;
use crate::models::shared::Pagination;
use crate::models::user::{
    SetAvatarRequest, SetAvatarResponse, SubscriptionListResponse, SubscriptionResponse,
    UserListQuery, UserListResponse, UserResponse, validate_set_avatar,
};
use crate::state::AppState;
use crate::utils::image;

async fn find_user(db: &impl ConnectionTrait, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Author ids (out of `author_ids`) that `viewer` follows.
async fn followed_set(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    author_ids: &[i32],
) -> Result<HashSet<i32>, AppError> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    let rows = subscription::Entity::find()
        .filter(subscription::Column::UserId.eq(viewer))
        .filter(subscription::Column::AuthorId.is_in(author_ids.to_vec()))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.author_id).collect())
}

/// Build the subscription payload: the author profile plus a newest-first
/// preview of their recipes.
async fn subscription_body(
    db: &DatabaseConnection,
    author: user::Model,
    base_url: &str,
) -> Result<SubscriptionResponse, AppError> {
    let recipes = recipe::Entity::find()
        .filter(recipe::Column::AuthorId.eq(author.id))
        .order_by_desc(recipe::Column::CreatedAt)
        .order_by_desc(recipe::Column::Id)
        .all(db)
        .await?;
    let recipes_count = recipes.len() as u64;
    let short: Vec<ShortRecipeResponse> = recipes
        .iter()
        .map(|r| ShortRecipeResponse::from_model(r, base_url))
        .collect();
    Ok(SubscriptionResponse {
        user: UserResponse::from_model(author, base_url, true),
        recipes: short,
        recipes_count,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Paginated user list", body = UserListResponse),
    ),
)]
#[instrument(skip(state, viewer, query))]
pub async fn list_users(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let select = user::Entity::find().order_by_asc(user::Column::Id);
    let total = select.clone().paginate(&state.db, per_page).num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let users = select
        .offset(Some((page - 1).saturating_mul(per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let followed = followed_set(&state.db, viewer.as_ref().map(|v| v.user_id), &ids).await?;

    let base_url = state.config.server.base_url.clone();
    let data = users
        .into_iter()
        .map(|u| {
            let is_subscribed = followed.contains(&u.id);
            UserResponse::from_model(u, &base_url, is_subscribed)
        })
        .collect();

    Ok(Json(UserListResponse {
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
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user's profile",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 404, description = "Unknown user (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer))]
pub async fn get_user(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let model = find_user(&state.db, id).await?;
    let followed = followed_set(&state.db, viewer.as_ref().map(|v| v.user_id), &[id]).await?;
    Ok(Json(UserResponse::from_model(
        model,
        &state.config.server.base_url,
        followed.contains(&id),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me/avatar",
    tag = "Users",
    operation_id = "setAvatar",
    summary = "Set the current user's avatar",
    request_body = SetAvatarRequest,
    responses(
        (status = 200, description = "Avatar stored", body = SetAvatarResponse),
        (status = 400, description = "Bad image payload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn set_avatar(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SetAvatarRequest>,
) -> Result<Json<SetAvatarResponse>, AppError> {
    validate_set_avatar(&payload)?;
    let decoded =
        image::decode_data_url(&payload.avatar).map_err(|e| AppError::Validation(e.message()))?;

    let model = find_user(&state.db, auth_user.user_id).await?;
    let previous = model.avatar.clone();

    let relative = image::store(&state.config.media.root, "avatars", &decoded)
        .await
        .map_err(|e| AppError::Internal(format!("Avatar write error: {}", e)))?;

    let mut active: user::ActiveModel = model.into();
    active.avatar = Set(Some(relative.clone()));
    active.update(&state.db).await?;

    if let Some(old) = previous {
        image::remove(&state.config.media.root, &old).await;
    }

    Ok(Json(SetAvatarResponse {
        avatar: format!("{}/media/{}", state.config.server.base_url, relative),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/me/avatar",
    tag = "Users",
    operation_id = "deleteAvatar",
    summary = "Remove the current user's avatar",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_avatar(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let model = find_user(&state.db, auth_user.user_id).await?;
    let previous = model.avatar.clone();

    let mut active: user::ActiveModel = model.into();
    active.avatar = Set(None);
    active.update(&state.db).await?;

    if let Some(old) = previous {
        image::remove(&state.config.media.root, &old).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/subscribe",
    tag = "Subscriptions",
    operation_id = "subscribe",
    summary = "Follow a user",
    description = "Creates a follower relation from the caller to the target user. \
                   Self-reference is rejected before the duplicate check.",
    params(("id" = i32, Path, description = "Target user ID")),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Self-subscription (SELF_SUBSCRIPTION)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown user (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already subscribed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, target = id))]
pub async fn subscribe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let target = find_user(&state.db, id).await?;

    if target.id == auth_user.user_id {
        return Err(AppError::SelfSubscription);
    }

    if subscription::Entity::find_by_id((auth_user.user_id, target.id))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Already subscribed to user '{}' (id {})",
            target.username, target.id
        )));
    }

    let row = subscription::ActiveModel {
        user_id: Set(auth_user.user_id),
        author_id: Set(target.id),
        created_at: Set(chrono::Utc::now()),
    };
    match row.insert(&state.db).await {
        Ok(_) => {}
        // Race between two identical subscribe requests: the composite key
        // serializes them and the loser surfaces a conflict.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Conflict(format!(
                "Already subscribed to user '{}' (id {})",
                target.username, target.id
            )));
        }
        Err(e) => return Err(e.into()),
    }

    let base_url = state.config.server.base_url.clone();
    let body = subscription_body(&state.db, target, &base_url).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/subscribe",
    tag = "Subscriptions",
    operation_id = "unsubscribe",
    summary = "Unfollow a user",
    params(("id" = i32, Path, description = "Target user ID")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not subscribed or unknown user (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, target = id))]
pub async fn unsubscribe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    find_user(&state.db, id).await?;

    let row = subscription::Entity::find_by_id((auth_user.user_id, id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Not subscribed to this user".into()))?;

    let active: subscription::ActiveModel = row.into();
    active.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/users/subscriptions",
    tag = "Subscriptions",
    operation_id = "listSubscriptions",
    summary = "List the authors the caller follows",
    params(UserListQuery),
    responses(
        (status = 200, description = "Paginated subscriptions", body = SubscriptionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_subscriptions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<SubscriptionListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let select = subscription::Entity::find()
        .filter(subscription::Column::UserId.eq(auth_user.user_id))
        .order_by_asc(subscription::Column::AuthorId);
    let total = select.clone().paginate(&state.db, per_page).num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let rows = select
        .offset(Some((page - 1).saturating_mul(per_page)))
        .limit(Some(per_page))
        .find_also_related(user::Entity)
        .all(&state.db)
        .await?;

    let base_url = state.config.server.base_url.clone();
    let mut data = Vec::with_capacity(rows.len());
    for (row, author) in rows {
        let author = author.ok_or_else(|| {
            AppError::Internal(format!(
                "subscription ({}, {}) references a missing author",
                row.user_id, row.author_id
            ))
        })?;
        data.push(subscription_body(&state.db, author, &base_url).await?);
    }

    Ok(Json(SubscriptionListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}
