// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    models::{
        auth::Role,
        user::{PublicUser, UserCredentials},
    },
};

const PUBLIC_COLUMNS: &str =
    "id, nome, sobrenome, email, role, estabelecimento_id, created_at, updated_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca as credenciais pelo e-mail (único ponto que lê a senha)
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let user = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PublicUser>, AppError> {
        let user = sqlx::query_as::<_, PublicUser>(&format!(
            "SELECT {PUBLIC_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Estabelecimento ao qual o usuário pertence. Base do escopo de tenant.
    pub async fn find_establishment_id(&self, user_id: i64) -> Result<Option<i64>, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT estabelecimento_id FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    /// Lista usuários; `Some(id)` restringe a um estabelecimento.
    pub async fn list(&self, estabelecimento_id: Option<i64>) -> Result<Vec<PublicUser>, AppError> {
        let users = match estabelecimento_id {
            Some(estab) => {
                sqlx::query_as::<_, PublicUser>(&format!(
                    "SELECT {PUBLIC_COLUMNS} FROM users WHERE estabelecimento_id = $1 ORDER BY id"
                ))
                .bind(estab)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PublicUser>(&format!(
                    "SELECT {PUBLIC_COLUMNS} FROM users ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(users)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn email_exists_excluding(&self, email: &str, id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // Cria um novo usuário no banco de dados.
    // E-mail duplicado e estabelecimento inexistente viram erros de domínio.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        nome: &str,
        sobrenome: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        estabelecimento_id: i64,
    ) -> Result<PublicUser, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PublicUser>(&format!(
            r#"
            INSERT INTO users (nome, sobrenome, email, password, role, estabelecimento_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PUBLIC_COLUMNS}
            "#
        ))
        .bind(nome)
        .bind(sobrenome)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(estabelecimento_id)
        .fetch_one(executor)
        .await
        .map_err(map_db_error)
    }

    pub async fn update_user<'e, E>(
        &self,
        executor: E,
        id: i64,
        nome: &str,
        sobrenome: &str,
        email: &str,
        role: Role,
        estabelecimento_id: i64,
    ) -> Result<Option<PublicUser>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PublicUser>(&format!(
            r#"
            UPDATE users
            SET nome = $1, sobrenome = $2, email = $3, role = $4,
                estabelecimento_id = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {PUBLIC_COLUMNS}
            "#
        ))
        .bind(nome)
        .bind(sobrenome)
        .bind(email)
        .bind(role.as_str())
        .bind(estabelecimento_id)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_db_error)
    }

    /// Retorna `true` se alguma linha foi removida.
    pub async fn delete_user<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
