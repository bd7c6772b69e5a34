// src/handlers/auth.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    common::{error::AppError, extract::extract_validated_json},
    config::AppState,
    models::{
        auth::{AuthResponse, LoginPayload, MessageResponse},
        user::SignupPayload,
    },
};

// POST /signup
#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    request_body = SignupPayload,
    responses(
        (status = 200, description = "Usuário cadastrado", body = MessageResponse),
        (status = 400, description = "Campos ausentes ou inválidos"),
        (status = 409, description = "E-mail já utilizado")
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    payload: Result<Json<SignupPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let payload = extract_validated_json(payload)?;

    app_state.auth_service.signup(&payload).await?;

    Ok(Json(MessageResponse::new("Cadastro realizado com sucesso")))
}

// POST /login
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token emitido (válido por 2 horas)", body = AuthResponse),
        (status = 400, description = "Corpo inválido"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let payload = extract_validated_json(payload)?;

    let token = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        message: "Login realizado com sucesso".to_string(),
        token,
    }))
}
