// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Um único tipo de erro para toda a aplicação.
// Cada variante conhecida tem um status e uma mensagem fixa para o cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    MalformedBody(String),

    #[error("Id inválido")]
    InvalidId,

    #[error("CPF ou CNPJ inválido")]
    InvalidTaxId,

    #[error("Estabelecimento informado não existe")]
    UnknownEstablishment,

    #[error("Estabelecimento obrigatório")]
    EstablishmentRequired,

    // --- Conflitos ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("SKU já existe")]
    SkuAlreadyExists,

    #[error("CPF/CNPJ já existe")]
    TaxIdAlreadyExists,

    #[error("Violação de restrição única: {0}")]
    UniqueConstraintViolation(String),

    // --- Autenticação ---
    #[error("Token ausente")]
    TokenRequired,

    #[error("Formato de token inválido")]
    InvalidTokenFormat,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Papel ausente no token")]
    MissingRole,

    #[error("Papel desconhecido no token")]
    InvalidRole,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    // --- Autorização ---
    #[error("Permissão negada")]
    PermissionDenied,

    #[error("Acesso negado a registro de outro estabelecimento")]
    AccessDenied,

    #[error("Tentativa de atribuir ou alterar papel OWNER")]
    RoleEscalation,

    // --- Não encontrados ---
    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Estabelecimento não encontrado")]
    EstablishmentNotFound,

    // --- Internos ---
    #[error("Configuração ausente: {0}")]
    Config(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MalformedBody(_)
            | AppError::InvalidId
            | AppError::InvalidTaxId
            | AppError::UnknownEstablishment
            | AppError::EstablishmentRequired => StatusCode::BAD_REQUEST,

            AppError::EmailAlreadyExists
            | AppError::SkuAlreadyExists
            | AppError::TaxIdAlreadyExists
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,

            AppError::TokenRequired
            | AppError::InvalidTokenFormat
            | AppError::InvalidToken
            | AppError::MissingRole
            | AppError::InvalidRole
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,

            AppError::PermissionDenied | AppError::AccessDenied | AppError::RoleEscalation => {
                StatusCode::FORBIDDEN
            }

            AppError::UserNotFound | AppError::ProductNotFound | AppError::EstablishmentNotFound => {
                StatusCode::NOT_FOUND
            }

            AppError::Config(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem exibida ao cliente. Nunca inclui detalhes do driver.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "Um ou mais campos são inválidos.",
            AppError::MalformedBody(_) => {
                "Requisição incompleta. Todos os campos obrigatórios devem ser preenchidos."
            }
            AppError::InvalidId => "Não foi possível converter o id",
            AppError::InvalidTaxId => "CPF ou CNPJ inválido.",
            AppError::UnknownEstablishment => "O estabelecimento informado não existe.",
            AppError::EstablishmentRequired => "O campo 'estabelecimento_id' é obrigatório.",
            AppError::EmailAlreadyExists => "Esse email já está sendo utilizado.",
            AppError::SkuAlreadyExists => "SKU já cadastrado",
            AppError::TaxIdAlreadyExists => {
                "Esse CPF ou CNPJ já foi cadastrado por outro estabelecimento"
            }
            AppError::UniqueConstraintViolation(_) => "Registro duplicado.",
            AppError::TokenRequired => "Token obrigatório",
            AppError::InvalidTokenFormat => "Formato do token inválido",
            AppError::InvalidToken => "Token inválido",
            AppError::MissingRole => "Sem papel definido no token",
            AppError::InvalidRole => "Formato inválido de papel",
            AppError::InvalidCredentials => "Credenciais inválidas",
            AppError::PermissionDenied => "Permissão negada para esta rota",
            AppError::AccessDenied => {
                "Acesso negado: o registro não pertence ao estabelecimento do usuário"
            }
            AppError::RoleEscalation => "Somente um OWNER pode atribuir ou alterar o papel OWNER",
            AppError::UserNotFound => "Usuário não encontrado.",
            AppError::ProductNotFound => "Produto não encontrado.",
            AppError::EstablishmentNotFound => "Estabelecimento não encontrado.",
            AppError::Config(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "Ocorreu um erro inesperado.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": self.public_message(),
                "details": details,
            }));
            return (status, body).into_response();
        }

        if status.is_server_error() {
            // O detalhe fica só no log
            tracing::error!("Erro Interno do Servidor: {}", self);
        } else {
            tracing::debug!(status = %status, "Requisição rejeitada: {}", self);
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_driver_details() {
        let err = AppError::DatabaseError(sqlx::Error::Protocol("senha do banco: hunter2".into()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Ocorreu um erro inesperado.");
        assert!(!body.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn validation_errors_carry_field_details() {
        let mut errors = validator::ValidationErrors::new();
        let mut e = validator::ValidationError::new("length");
        e.message = Some("O nome é obrigatório.".into());
        errors.add("nome", e);

        let (status, body) = body_json(AppError::ValidationError(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["nome"][0], "O nome é obrigatório.");
    }

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        assert_eq!(AppError::EmailAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::TaxIdAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidRole.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::AccessDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ProductNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidTaxId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Config("SECRET_KEY".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
