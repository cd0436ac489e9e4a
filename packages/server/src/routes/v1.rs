use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/ingredients", ingredient_routes())
        .nest("/recipes", recipe_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn user_routes() -> Router<AppState> {
    // Literal segments before "/{id}" so they are not captured as ids.
    Router::new()
        .route("/", get(handlers::user::list_users))
        .route("/subscriptions", get(handlers::user::list_subscriptions))
        .route(
            "/me/avatar",
            put(handlers::user::set_avatar).delete(handlers::user::delete_avatar),
        )
        .route("/{id}", get(handlers::user::get_user))
        .route(
            "/{id}/subscribe",
            post(handlers::user::subscribe).delete(handlers::user::unsubscribe),
        )
}

fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::ingredient::list_ingredients))
        .route("/{id}", get(handlers::ingredient::get_ingredient))
}

fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::recipe::list_recipes).post(handlers::recipe::create_recipe),
        )
        .route(
            "/download_shopping_cart",
            get(handlers::recipe::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(handlers::recipe::get_recipe)
                .patch(handlers::recipe::update_recipe)
                .delete(handlers::recipe::delete_recipe),
        )
        .route("/{id}/get-link", get(handlers::recipe::get_short_link))
        .route(
            "/{id}/favorite",
            post(handlers::recipe::add_favorite).delete(handlers::recipe::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(handlers::recipe::add_to_cart).delete(handlers::recipe::remove_from_cart),
        )
}
