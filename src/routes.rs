// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    config::AppState,
    docs,
    handlers::{auth, establishments, products, users},
    middleware::auth::auth_guard,
};

pub fn router(app_state: AppState) -> Router {
    // Rotas protegidas: o token é exigido antes de qualquer extrator
    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/establishments",
            get(establishments::list_establishments).post(establishments::create_establishment),
        )
        .route(
            "/establishments/{id}",
            get(establishments::get_establishment)
                .put(establishments::update_establishment)
                .delete(establishments::delete_establishment),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
