// src/docs.rs

use axum::Json;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Establishments ---
        handlers::establishments::create_establishment,
        handlers::establishments::list_establishments,
        handlers::establishments::get_establishment,
        handlers::establishments::update_establishment,
        handlers::establishments::delete_establishment,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::MessageResponse,

            // --- Users ---
            models::user::PublicUser,
            models::user::SignupPayload,
            models::user::UpdateUserPayload,

            // --- Products ---
            models::product::Product,
            models::product::ProductPayload,
            models::product::ProductUpdatedResponse,

            // --- Establishments ---
            models::establishment::Address,
            models::establishment::Establishment,
            models::establishment::EstablishmentPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro e Login"),
        (name = "Users", description = "Usuários do Estabelecimento"),
        (name = "Products", description = "Produtos e Estoque"),
        (name = "Establishments", description = "Estabelecimentos e Endereços (somente OWNER)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_and_the_bearer_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/signup",
            "/login",
            "/users",
            "/users/{id}",
            "/products",
            "/products/{id}",
            "/establishments",
            "/establishments/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota ausente: {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
        assert!(components.schemas.contains_key("Product"));
    }
}
