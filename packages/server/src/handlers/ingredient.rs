use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::ingredient;
use crate::error::{AppError, ErrorBody};
use crate::models::ingredient::{IngredientListQuery, IngredientResponse};
use crate::models::shared::escape_like;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    tag = "Ingredients",
    operation_id = "listIngredients",
    summary = "List ingredients with an optional name-prefix filter",
    params(IngredientListQuery),
    responses(
        (status = 200, description = "Reference list, ordered by name", body = [IngredientResponse]),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientListQuery>,
) -> Result<Json<Vec<IngredientResponse>>, AppError> {
    let mut select = ingredient::Entity::find();

    if let Some(ref name) = query.name {
        let prefix = escape_like(name.trim());
        if !prefix.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(ingredient::Column::Name)))
                    .like(LikeExpr::new(format!("{}%", prefix.to_lowercase())).escape('\\')),
            );
        }
    }

    let data = select
        .order_by_asc(ingredient::Column::Name)
        .all(&state.db)
        .await?
        .into_iter()
        .map(IngredientResponse::from)
        .collect();

    Ok(Json(data))
}

#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    tag = "Ingredients",
    operation_id = "getIngredient",
    summary = "Get one ingredient by id",
    params(("id" = i32, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Unknown ingredient (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<IngredientResponse>, AppError> {
    let model = ingredient::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient not found".into()))?;

    Ok(Json(model.into()))
}
