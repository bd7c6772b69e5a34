// src/handlers/products.rs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    common::{
        error::AppError,
        extract::{extract_id, extract_validated_json},
    },
    config::AppState,
    middleware::{
        rbac::{AnyRole, OwnerOrManager, RequireRole},
        tenancy::TenantScope,
    },
    models::{
        auth::MessageResponse,
        product::{Product, ProductPayload, ProductQuery, ProductUpdatedResponse},
    },
};

// GET /products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Produtos do escopo de quem chama", body = Vec<Product>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyRole>,
    scope: TenantScope,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    // Query string ilegível vale como "sem filtros"
    let query = query.map(|Query(q)| q).unwrap_or_default();

    let products = app_state.product_service.list(scope, &query).await?;
    Ok(Json(products))
}

// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 400, description = "Id inválido"),
        (status = 403, description = "Produto de outro estabelecimento"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyRole>,
    id: Result<Path<i64>, PathRejection>,
    scope: TenantScope,
) -> Result<Json<Product>, AppError> {
    let id = extract_id(id)?;
    let product = app_state.product_service.get(scope, id).await?;
    Ok(Json(product))
}

// POST /products
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Campos inválidos ou estabelecimento inexistente"),
        (status = 403, description = "Papel sem permissão"),
        (status = 409, description = "SKU já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    guard: RequireRole<OwnerOrManager>,
    scope: TenantScope,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let payload = extract_validated_json(payload)?;

    let product = app_state.product_service.create(scope, &payload).await?;

    tracing::info!(
        product_id = product.id,
        estabelecimento_id = product.estabelecimento_id,
        by = %guard.caller.email,
        "Produto criado"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Id do produto")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = ProductUpdatedResponse),
        (status = 400, description = "Campos inválidos"),
        (status = 403, description = "Produto de outro estabelecimento"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "SKU já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<OwnerOrManager>,
    id: Result<Path<i64>, PathRejection>,
    scope: TenantScope,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<ProductUpdatedResponse>, AppError> {
    let id = extract_id(id)?;
    let payload = extract_validated_json(payload)?;

    let produto = app_state.product_service.update(scope, id, &payload).await?;

    Ok(Json(ProductUpdatedResponse {
        message: "Produto atualizado com sucesso".to_string(),
        produto,
    }))
}

// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "Produto removido", body = MessageResponse),
        (status = 403, description = "Produto de outro estabelecimento"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<OwnerOrManager>,
    id: Result<Path<i64>, PathRejection>,
    scope: TenantScope,
) -> Result<Json<MessageResponse>, AppError> {
    let id = extract_id(id)?;

    app_state.product_service.delete(scope, id).await?;

    Ok(Json(MessageResponse::new("Produto deletado com sucesso")))
}
