pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod shopping_list;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foodgram API",
        version = "1.0.0",
        description = "API for the Foodgram recipe sharing service"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::user::list_users,
        handlers::user::list_subscriptions,
        handlers::user::get_user,
        handlers::user::set_avatar,
        handlers::user::delete_avatar,
        handlers::user::subscribe,
        handlers::user::unsubscribe,
        handlers::ingredient::list_ingredients,
        handlers::ingredient::get_ingredient,
        handlers::recipe::list_recipes,
        handlers::recipe::create_recipe,
        handlers::recipe::get_recipe,
        handlers::recipe::update_recipe,
        handlers::recipe::delete_recipe,
        handlers::recipe::get_short_link,
        handlers::recipe::add_favorite,
        handlers::recipe::remove_favorite,
        handlers::recipe::add_to_cart,
        handlers::recipe::remove_from_cart,
        handlers::recipe::download_shopping_cart,
    ),
    components(schemas(
        error::ErrorBody,
        models::shared::Pagination,
        models::auth::RegisterRequest,
        models::auth::LoginRequest,
        models::auth::LoginResponse,
        models::user::UserResponse,
        models::user::UserListResponse,
        models::user::SetAvatarRequest,
        models::user::SetAvatarResponse,
        models::user::SubscriptionResponse,
        models::user::SubscriptionListResponse,
        models::ingredient::IngredientResponse,
        models::recipe::IngredientLineInput,
        models::recipe::IngredientLineResponse,
        models::recipe::CreateRecipeRequest,
        models::recipe::UpdateRecipeRequest,
        models::recipe::RecipeResponse,
        models::recipe::RecipeListResponse,
        models::recipe::ShortRecipeResponse,
        models::recipe::ShortLinkResponse,
    )),
    tags(
        (name = "Auth", description = "Registration and token authentication"),
        (name = "Users", description = "Profiles and avatars"),
        (name = "Subscriptions", description = "Follower relations between users"),
        (name = "Ingredients", description = "Ingredient reference table"),
        (name = "Recipes", description = "Recipe CRUD, favorites, cart and shopping-list export"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allow_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allow_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let api = ApiDoc::openapi();
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .route("/media/{*path}", get(handlers::media::serve_media))
        .route("/s/{id}", get(handlers::recipe::resolve_short_link))
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}
