// src/db/establishment_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    models::establishment::{Address, Establishment},
};

const SELECT_WITH_ADDRESS: &str = r#"
    SELECT
        e.id, e.razao_social, e.cpf_cnpj, e.endereco_id, e.created_at, e.updated_at,
        a.logradouro, a.complemento, a.numero, a.bairro, a.cidade, a.uf, a.cep
    FROM estabelecimentos e
    JOIN enderecos a ON a.id = e.endereco_id
"#;

// Estabelecimentos e seus endereços. As escritas recebem o executor
// da transação aberta pelo serviço.
#[derive(Clone)]
pub struct EstablishmentRepository {
    pool: PgPool,
}

impl EstablishmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list(&self) -> Result<Vec<Establishment>, AppError> {
        let establishments =
            sqlx::query_as::<_, Establishment>(&format!("{SELECT_WITH_ADDRESS} ORDER BY e.id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(establishments)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<Establishment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let establishment =
            sqlx::query_as::<_, Establishment>(&format!("{SELECT_WITH_ADDRESS} WHERE e.id = $1"))
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(establishment)
    }

    pub async fn tax_id_exists<'e, E>(&self, executor: E, cpf_cnpj: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM estabelecimentos WHERE cpf_cnpj = $1)",
        )
        .bind(cpf_cnpj)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn tax_id_exists_excluding<'e, E>(
        &self,
        executor: E,
        cpf_cnpj: &str,
        id: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM estabelecimentos WHERE cpf_cnpj = $1 AND id <> $2)",
        )
        .bind(cpf_cnpj)
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    // ---
    // Endereços
    // ---

    /// Insere o endereço e devolve o id gerado.
    pub async fn insert_address<'e, E>(&self, executor: E, address: &Address) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO enderecos (logradouro, complemento, numero, bairro, cidade, uf, cep)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&address.logradouro)
        .bind(&address.complemento)
        .bind(address.numero)
        .bind(&address.bairro)
        .bind(&address.cidade)
        .bind(&address.uf)
        .bind(&address.cep)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn update_address<'e, E>(
        &self,
        executor: E,
        id: i64,
        address: &Address,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE enderecos
            SET logradouro = $1, complemento = $2, numero = $3, bairro = $4,
                cidade = $5, uf = $6, cep = $7
            WHERE id = $8
            "#,
        )
        .bind(&address.logradouro)
        .bind(&address.complemento)
        .bind(address.numero)
        .bind(&address.bairro)
        .bind(&address.cidade)
        .bind(&address.uf)
        .bind(&address.cep)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn delete_address<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM enderecos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Estabelecimentos
    // ---

    pub async fn insert_establishment<'e, E>(
        &self,
        executor: E,
        razao_social: &str,
        cpf_cnpj: &str,
        endereco_id: i64,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO estabelecimentos (razao_social, cpf_cnpj, endereco_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(razao_social)
        .bind(cpf_cnpj)
        .bind(endereco_id)
        .fetch_one(executor)
        .await
        .map_err(map_db_error)
    }

    pub async fn update_establishment<'e, E>(
        &self,
        executor: E,
        id: i64,
        razao_social: &str,
        cpf_cnpj: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE estabelecimentos
            SET razao_social = $1, cpf_cnpj = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(razao_social)
        .bind(cpf_cnpj)
        .bind(id)
        .execute(executor)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete_establishment<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM estabelecimentos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
