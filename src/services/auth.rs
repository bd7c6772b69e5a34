// src/services/auth.rs

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::OnceCell;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::user::{PublicUser, SignupPayload},
    services::credentials::{hash_password, verify_password, TokenService},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tokens: TokenService,
    pool: PgPool,
    bcrypt_cost: u32,
    // Hash descartável, mesmo custo dos reais; usado quando o e-mail não existe
    dummy_hash: Arc<OnceCell<String>>,
}

const DUMMY_PASSWORD: &str = "usuario-inexistente";

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        tokens: TokenService,
        pool: PgPool,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_repo,
            tokens,
            pool,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn signup(&self, payload: &SignupPayload) -> Result<PublicUser, AppError> {
        // Verificação rápida; a restrição única continua valendo se perdermos a corrida
        if self.user_repo.email_exists(&payload.email).await? {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed_password = hash_password(&payload.password, self.bcrypt_cost).await?;

        let user = self
            .user_repo
            .create_user(
                &self.pool,
                &payload.nome,
                &payload.sobrenome,
                &payload.email,
                &hashed_password,
                payload.role,
                payload.estabelecimento_id,
            )
            .await?;

        tracing::info!(user_id = user.id, estabelecimento_id = user.estabelecimento_id, "Usuário cadastrado");
        Ok(user)
    }

    /// E-mail desconhecido e senha errada produzem o mesmo erro,
    /// e os dois caminhos passam por uma verificação bcrypt.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.user_repo.find_credentials_by_email(email).await? else {
            return self.reject_unknown_user(password).await;
        };

        if !verify_password(password, &user.password).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.tokens.issue_token(&user.email, user.role, user.id)
    }

    async fn reject_unknown_user(&self, password: &str) -> Result<String, AppError> {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD, self.bcrypt_cost))
            .await?;
        verify_password(password, dummy).await?;
        Err(AppError::InvalidCredentials)
    }
}
