// src/handlers/users.rs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::{
    common::{
        error::AppError,
        extract::{extract_id, extract_validated_json},
    },
    config::AppState,
    middleware::{
        rbac::{OwnerOrManager, RequireRole},
        tenancy::TenantScope,
    },
    models::{
        auth::MessageResponse,
        user::{PublicUser, UpdateUserPayload},
    },
};

// GET /users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários visíveis para quem chama", body = Vec<PublicUser>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Papel sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequireRole<OwnerOrManager>,
    scope: TenantScope,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = app_state.user_service.list(scope).await?;
    Ok(Json(users))
}

// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "Id do usuário")),
    responses(
        (status = 200, description = "Usuário", body = PublicUser),
        (status = 403, description = "Usuário de outro estabelecimento"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    _guard: RequireRole<OwnerOrManager>,
    id: Result<Path<i64>, PathRejection>,
    scope: TenantScope,
) -> Result<Json<PublicUser>, AppError> {
    let id = extract_id(id)?;
    let user = app_state.user_service.get(scope, id).await?;
    Ok(Json(user))
}

// PUT /users/{id}
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "Id do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = PublicUser),
        (status = 400, description = "Campos inválidos"),
        (status = 403, description = "Outro estabelecimento ou papel OWNER"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "E-mail já utilizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    guard: RequireRole<OwnerOrManager>,
    id: Result<Path<i64>, PathRejection>,
    scope: TenantScope,
    payload: Result<Json<UpdateUserPayload>, JsonRejection>,
) -> Result<Json<PublicUser>, AppError> {
    let id = extract_id(id)?;
    let payload = extract_validated_json(payload)?;

    let user = app_state
        .user_service
        .update(&guard.caller, scope, id, &payload)
        .await?;

    tracing::info!(user_id = id, by = %guard.caller.email, "Usuário atualizado");
    Ok(Json(user))
}

// DELETE /users/{id}
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "Id do usuário")),
    responses(
        (status = 200, description = "Usuário removido", body = MessageResponse),
        (status = 403, description = "Outro estabelecimento ou alvo OWNER"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    guard: RequireRole<OwnerOrManager>,
    id: Result<Path<i64>, PathRejection>,
    scope: TenantScope,
) -> Result<Json<MessageResponse>, AppError> {
    let id = extract_id(id)?;

    app_state
        .user_service
        .delete(&guard.caller, scope, id)
        .await?;

    tracing::info!(user_id = id, by = %guard.caller.email, "Usuário removido");
    Ok(Json(MessageResponse::new("Usuário deletado com sucesso")))
}
