// src/services/credentials.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::{auth::Claims, auth::Role},
};

pub const TOKEN_LIFETIME_HOURS: i64 = 2;

// ---
// Senhas
// ---
// bcrypt é caro de propósito; roda fora das threads do runtime.

pub async fn hash_password(plain: &str, cost: u32) -> Result<String, AppError> {
    let password = plain.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(plain: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = plain.to_owned();
    let password_hash = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

// ---
// Tokens
// ---

/// Emite e valida JWTs HS256 com o segredo do servidor.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.trim().is_empty() {
            return Err(AppError::Config("SECRET_KEY".to_string()));
        }

        // Só HS256; qualquer outro algoritmo no cabeçalho é rejeitado.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue_token(&self, email: &str, role: Role, user_id: i64) -> Result<String, AppError> {
        let expires_at = Utc::now() + chrono::Duration::hours(TOKEN_LIFETIME_HOURS);

        let claims = Claims {
            email: email.to_string(),
            role: role.as_str().to_string(),
            user_id,
            exp: expires_at.timestamp() as usize,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Estrutura, assinatura, algoritmo e expiração. O papel continua
    /// texto aqui; quem o interpreta é o guardião de papéis.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejeitado: {}", e);
                AppError::InvalidToken
            })
    }
}
