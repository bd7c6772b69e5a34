// src/services/product_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    middleware::tenancy::TenantScope,
    models::product::{Product, ProductPayload, ProductQuery},
    services::product_filter::build_predicates,
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { product_repo, pool }
    }

    pub async fn list(&self, scope: TenantScope, query: &ProductQuery) -> Result<Vec<Product>, AppError> {
        let predicates = build_predicates(scope, query);
        self.product_repo.list(&predicates).await
    }

    pub async fn get(&self, scope: TenantScope, id: i64) -> Result<Product, AppError> {
        let product = self
            .product_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        scope.ensure_access(product.estabelecimento_id)?;
        Ok(product)
    }

    pub async fn create(&self, scope: TenantScope, payload: &ProductPayload) -> Result<Product, AppError> {
        let estabelecimento_id = scope
            .resolve_establishment(payload.estabelecimento_id)
            .ok_or(AppError::EstablishmentRequired)?;

        if self.product_repo.sku_exists(&payload.sku).await? {
            return Err(AppError::SkuAlreadyExists);
        }

        let (valor, estoque) = payload.normalized_amounts();
        self.product_repo
            .create_product(
                &self.pool,
                &payload.nome,
                &payload.sku,
                &payload.descricao,
                valor,
                estoque,
                estabelecimento_id,
            )
            .await
    }

    pub async fn update(
        &self,
        scope: TenantScope,
        id: i64,
        payload: &ProductPayload,
    ) -> Result<Product, AppError> {
        let current = self.get(scope, id).await?;

        let estabelecimento_id = scope
            .resolve_establishment(payload.estabelecimento_id)
            .unwrap_or(current.estabelecimento_id);

        if self.product_repo.sku_exists_excluding(&payload.sku, id).await? {
            return Err(AppError::SkuAlreadyExists);
        }

        let (valor, estoque) = payload.normalized_amounts();
        self.product_repo
            .update_product(
                &self.pool,
                id,
                &payload.nome,
                &payload.sku,
                &payload.descricao,
                valor,
                estoque,
                estabelecimento_id,
            )
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn delete(&self, scope: TenantScope, id: i64) -> Result<(), AppError> {
        self.get(scope, id).await?;

        if !self.product_repo.delete_product(&self.pool, id).await? {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }
}
