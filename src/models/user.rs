// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::auth::Role;

// Dados mínimos para conferir credenciais no login
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub password: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

// Projeção pública: tudo menos a senha
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct PublicUser {
    pub id: i64,
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub estabelecimento_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupPayload {
    #[validate(length(min = 1, max = 50, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(length(min = 1, max = 50, message = "O sobrenome é obrigatório."))]
    pub sobrenome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "a@b.com")]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
    pub role: Role,
    pub estabelecimento_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, max = 50, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(length(min = 1, max = 50, message = "O sobrenome é obrigatório."))]
    pub sobrenome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub role: Role,
    // Ignorado para quem não é OWNER
    pub estabelecimento_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_serializes_a_password_field() {
        let user = PublicUser {
            id: 1,
            nome: "A".into(),
            sobrenome: "B".into(),
            email: "a@b.com".into(),
            role: Role::Seller,
            estabelecimento_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "SELLER");
    }

    #[test]
    fn signup_payload_accepts_short_password() {
        let payload: SignupPayload = serde_json::from_str(
            r#"{"nome":"A","sobrenome":"B","email":"a@b.com","password":"x","role":"OWNER","estabelecimento_id":1}"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.role, Role::Owner);
    }

    #[test]
    fn signup_payload_rejects_bad_email() {
        let payload: SignupPayload = serde_json::from_str(
            r#"{"nome":"A","sobrenome":"B","email":"nope","password":"x","role":"SELLER","estabelecimento_id":1}"#,
        )
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn signup_payload_rejects_unknown_role() {
        let result = serde_json::from_str::<SignupPayload>(
            r#"{"nome":"A","sobrenome":"B","email":"a@b.com","password":"x","role":"ADMIN","estabelecimento_id":1}"#,
        );
        assert!(result.is_err());
    }
}
