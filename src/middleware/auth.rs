// src/middleware/auth.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejectionReason,
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState};

// Identidade extraída do token. O papel ainda é texto: quem decide se ele
// é válido é o `RequireRole`.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

// O middleware em si: aplicado em todas as rotas protegidas
pub async fn auth_guard(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|rejection| match rejection.reason() {
            TypedHeaderRejectionReason::Missing => AppError::TokenRequired,
            _ => AppError::InvalidTokenFormat,
        })?;

    let claims = app_state.token_service.validate_token(bearer.token())?;

    // Insere a identidade nos "extensions" da requisição
    parts.extensions.insert(Identity {
        user_id: claims.user_id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(Request::from_parts(parts, body)).await)
}
