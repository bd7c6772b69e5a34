// src/services/establishment_service.rs

use sqlx::{PgConnection, PgPool};

use crate::{
    common::{db_utils::rollback, error::AppError, tax_id::normalize_tax_id},
    db::EstablishmentRepository,
    models::establishment::{Establishment, EstablishmentPayload},
};

#[derive(Clone)]
pub struct EstablishmentService {
    establishment_repo: EstablishmentRepository,
    pool: PgPool,
}

impl EstablishmentService {
    pub fn new(establishment_repo: EstablishmentRepository, pool: PgPool) -> Self {
        Self { establishment_repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<Establishment>, AppError> {
        self.establishment_repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Establishment, AppError> {
        self.establishment_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)
    }

    /// Endereço e estabelecimento nascem juntos ou não nascem.
    pub async fn create(&self, payload: &EstablishmentPayload) -> Result<Establishment, AppError> {
        let (cpf_cnpj, kind) = normalize_tax_id(&payload.cpf_cnpj)?;

        let mut tx = self.pool.begin().await?;

        match self.create_in_tx(&mut tx, payload, &cpf_cnpj).await {
            Ok(establishment) => {
                tx.commit().await?;
                tracing::info!(
                    estabelecimento_id = establishment.id,
                    tipo = ?kind,
                    "Estabelecimento cadastrado"
                );
                Ok(establishment)
            }
            Err(e) => {
                rollback(tx, &e).await;
                Err(e)
            }
        }
    }

    async fn create_in_tx(
        &self,
        conn: &mut PgConnection,
        payload: &EstablishmentPayload,
        cpf_cnpj: &str,
    ) -> Result<Establishment, AppError> {
        // 1. Endereço
        let endereco_id = self
            .establishment_repo
            .insert_address(&mut *conn, &payload.endereco)
            .await?;

        // 2. Documento único
        if self.establishment_repo.tax_id_exists(&mut *conn, cpf_cnpj).await? {
            return Err(AppError::TaxIdAlreadyExists);
        }

        // 3. Estabelecimento apontando para o endereço novo
        let id = self
            .establishment_repo
            .insert_establishment(&mut *conn, &payload.razao_social, cpf_cnpj, endereco_id)
            .await?;

        self.establishment_repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)
    }

    pub async fn update(
        &self,
        id: i64,
        payload: &EstablishmentPayload,
    ) -> Result<Establishment, AppError> {
        let (cpf_cnpj, _) = normalize_tax_id(&payload.cpf_cnpj)?;

        let mut tx = self.pool.begin().await?;

        match self.update_in_tx(&mut tx, id, payload, &cpf_cnpj).await {
            Ok(establishment) => {
                tx.commit().await?;
                Ok(establishment)
            }
            Err(e) => {
                rollback(tx, &e).await;
                Err(e)
            }
        }
    }

    async fn update_in_tx(
        &self,
        conn: &mut PgConnection,
        id: i64,
        payload: &EstablishmentPayload,
        cpf_cnpj: &str,
    ) -> Result<Establishment, AppError> {
        let current = self
            .establishment_repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        if self
            .establishment_repo
            .tax_id_exists_excluding(&mut *conn, cpf_cnpj, id)
            .await?
        {
            return Err(AppError::TaxIdAlreadyExists);
        }

        self.establishment_repo
            .update_address(&mut *conn, current.endereco_id, &payload.endereco)
            .await?;

        self.establishment_repo
            .update_establishment(&mut *conn, id, &payload.razao_social, cpf_cnpj)
            .await?;

        self.establishment_repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)
    }

    /// Usuários e produtos caem junto pelo ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        match self.delete_in_tx(&mut tx, id).await {
            Ok(()) => {
                tx.commit().await?;
                tracing::info!(estabelecimento_id = id, "Estabelecimento removido");
                Ok(())
            }
            Err(e) => {
                rollback(tx, &e).await;
                Err(e)
            }
        }
    }

    async fn delete_in_tx(&self, conn: &mut PgConnection, id: i64) -> Result<(), AppError> {
        let current = self
            .establishment_repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        // Estabelecimento primeiro, depois o endereço
        self.establishment_repo
            .delete_establishment(&mut *conn, id)
            .await?;
        self.establishment_repo
            .delete_address(&mut *conn, current.endereco_id)
            .await?;

        Ok(())
    }
}
