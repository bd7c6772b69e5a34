// src/handlers/establishments.rs
//
// Todas as rotas daqui são exclusivas do OWNER.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
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
    middleware::rbac::{OwnerOnly, RequireRole},
    models::{
        auth::MessageResponse,
        establishment::{Establishment, EstablishmentPayload},
    },
};

// POST /establishments
#[utoipa::path(
    post,
    path = "/establishments",
    tag = "Establishments",
    request_body = EstablishmentPayload,
    responses(
        (status = 201, description = "Estabelecimento e endereço criados", body = Establishment),
        (status = 400, description = "Campos inválidos ou CPF/CNPJ inválido"),
        (status = 403, description = "Somente OWNER"),
        (status = 409, description = "CPF/CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_establishment(
    State(app_state): State<AppState>,
    guard: RequireRole<OwnerOnly>,
    payload: Result<Json<EstablishmentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Establishment>), AppError> {
    let payload = extract_validated_json(payload)?;

    let establishment = app_state.establishment_service.create(&payload).await?;

    tracing::debug!(by = %guard.caller.email, "Estabelecimento criado");
    Ok((StatusCode::CREATED, Json(establishment)))
}

// GET /establishments
#[utoipa::path(
    get,
    path = "/establishments",
    tag = "Establishments",
    responses(
        (status = 200, description = "Todos os estabelecimentos", body = Vec<Establishment>),
        (status = 403, description = "Somente OWNER")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_establishments(
    State(app_state): State<AppState>,
    _guard: RequireRole<OwnerOnly>,
) -> Result<Json<Vec<Establishment>>, AppError> {
    let establishments = app_state.establishment_service.list().await?;
    Ok(Json(establishments))
}

// GET /establishments/{id}
#[utoipa::path(
    get,
    path = "/establishments/{id}",
    tag = "Establishments",
    params(("id" = i64, Path, description = "Id do estabelecimento")),
    responses(
        (status = 200, description = "Estabelecimento", body = Establishment),
        (status = 400, description = "Id inválido"),
        (status = 404, description = "Estabelecimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_establishment(
    State(app_state): State<AppState>,
    _guard: RequireRole<OwnerOnly>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Establishment>, AppError> {
    let id = extract_id(id)?;
    let establishment = app_state.establishment_service.get(id).await?;
    Ok(Json(establishment))
}

// PUT /establishments/{id}
#[utoipa::path(
    put,
    path = "/establishments/{id}",
    tag = "Establishments",
    params(("id" = i64, Path, description = "Id do estabelecimento")),
    request_body = EstablishmentPayload,
    responses(
        (status = 200, description = "Estabelecimento atualizado", body = Establishment),
        (status = 400, description = "Campos inválidos ou CPF/CNPJ inválido"),
        (status = 404, description = "Estabelecimento não encontrado"),
        (status = 409, description = "CPF/CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_establishment(
    State(app_state): State<AppState>,
    _guard: RequireRole<OwnerOnly>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EstablishmentPayload>, JsonRejection>,
) -> Result<Json<Establishment>, AppError> {
    let id = extract_id(id)?;
    let payload = extract_validated_json(payload)?;

    let establishment = app_state.establishment_service.update(id, &payload).await?;
    Ok(Json(establishment))
}

// DELETE /establishments/{id}
#[utoipa::path(
    delete,
    path = "/establishments/{id}",
    tag = "Establishments",
    params(("id" = i64, Path, description = "Id do estabelecimento")),
    responses(
        (status = 200, description = "Estabelecimento, endereço, usuários e produtos removidos", body = MessageResponse),
        (status = 404, description = "Estabelecimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_establishment(
    State(app_state): State<AppState>,
    _guard: RequireRole<OwnerOnly>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = extract_id(id)?;

    app_state.establishment_service.delete(id).await?;

    Ok(Json(MessageResponse::new("Estabelecimento deletado com sucesso.")))
}
