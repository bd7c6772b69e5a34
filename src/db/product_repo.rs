// src/db/product_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    models::product::Product,
};

// ---
// Filtros tipados
// ---
// Cada predicado vira um fragmento parametrizado. Nada do usuário
// é concatenado no SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductPredicate {
    Establishment(i64),
    Sku(String),
    DescriptionContains(String),
    Price(Decimal),
    CreatedBetween(DateTime<Utc>, DateTime<Utc>),
}

/// Escapa os curingas do LIKE para a busca ser por trecho literal.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub(crate) fn push_predicates<'args>(
    builder: &mut QueryBuilder<'args, Postgres>,
    predicates: &[ProductPredicate],
) {
    for predicate in predicates {
        match predicate {
            ProductPredicate::Establishment(id) => {
                builder.push(" AND estabelecimento_id = ").push_bind(*id);
            }
            ProductPredicate::Sku(sku) => {
                builder.push(" AND sku = ").push_bind(sku.clone());
            }
            ProductPredicate::DescriptionContains(text) => {
                builder.push(" AND descricao ILIKE ").push_bind(escape_like(text));
            }
            ProductPredicate::Price(valor) => {
                builder.push(" AND valor = ").push_bind(*valor);
            }
            ProductPredicate::CreatedBetween(start, end) => {
                builder
                    .push(" AND created_at BETWEEN ")
                    .push_bind(*start)
                    .push(" AND ")
                    .push_bind(*end);
            }
        }
    }
}

pub(crate) fn list_query(predicates: &[ProductPredicate]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM products WHERE 1=1");
    push_predicates(&mut builder, predicates);
    builder.push(" ORDER BY id");
    builder
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, predicates: &[ProductPredicate]) -> Result<Vec<Product>, AppError> {
        let mut builder = list_query(predicates);
        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn sku_exists(&self, sku: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1)",
        )
        .bind(sku)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn sku_exists_excluding(&self, sku: &str, id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1 AND id <> $2)",
        )
        .bind(sku)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        nome: &str,
        sku: &str,
        descricao: &str,
        valor: Decimal,
        estoque: Decimal,
        estabelecimento_id: i64,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (nome, sku, descricao, valor, estoque, estabelecimento_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(sku)
        .bind(descricao)
        .bind(valor)
        .bind(estoque)
        .bind(estabelecimento_id)
        .fetch_one(executor)
        .await
        .map_err(map_db_error)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: i64,
        nome: &str,
        sku: &str,
        descricao: &str,
        valor: Decimal,
        estoque: Decimal,
        estabelecimento_id: i64,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET nome = $1, sku = $2, descricao = $3, valor = $4, estoque = $5,
                estabelecimento_id = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(sku)
        .bind(descricao)
        .bind(valor)
        .bind(estoque)
        .bind(estabelecimento_id)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_db_error)
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
