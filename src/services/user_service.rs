// src/services/user_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserRepository,
    middleware::{rbac::Caller, tenancy::TenantScope},
    models::{
        auth::Role,
        user::{PublicUser, UpdateUserPayload},
    },
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    pool: PgPool,
}

/// Quem não é OWNER não concede nem altera o papel OWNER.
pub fn check_role_change(caller: Role, current: Role, requested: Role) -> Result<(), AppError> {
    if caller != Role::Owner && (current == Role::Owner || requested == Role::Owner) {
        return Err(AppError::RoleEscalation);
    }
    Ok(())
}

impl UserService {
    pub fn new(user_repo: UserRepository, pool: PgPool) -> Self {
        Self { user_repo, pool }
    }

    pub async fn list(&self, scope: TenantScope) -> Result<Vec<PublicUser>, AppError> {
        self.user_repo.list(scope.establishment_filter()).await
    }

    pub async fn get(&self, scope: TenantScope, id: i64) -> Result<PublicUser, AppError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        scope.ensure_access(user.estabelecimento_id)?;
        Ok(user)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        scope: TenantScope,
        id: i64,
        payload: &UpdateUserPayload,
    ) -> Result<PublicUser, AppError> {
        let current = self.get(scope, id).await?;

        if let Err(e) = check_role_change(caller.role, current.role, payload.role) {
            tracing::warn!(
                caller_id = caller.user_id,
                target_id = id,
                requested = %payload.role,
                "Tentativa de escalar papel bloqueada"
            );
            return Err(e);
        }

        let estabelecimento_id = scope
            .resolve_establishment(payload.estabelecimento_id)
            .unwrap_or(current.estabelecimento_id);

        if self.user_repo.email_exists_excluding(&payload.email, id).await? {
            return Err(AppError::EmailAlreadyExists);
        }

        self.user_repo
            .update_user(
                &self.pool,
                id,
                &payload.nome,
                &payload.sobrenome,
                &payload.email,
                payload.role,
                estabelecimento_id,
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn delete(&self, caller: &Caller, scope: TenantScope, id: i64) -> Result<(), AppError> {
        let current = self.get(scope, id).await?;

        // Só um OWNER remove outro OWNER
        if caller.role != Role::Owner && current.role == Role::Owner {
            tracing::warn!(
                caller_id = caller.user_id,
                target_id = id,
                "Tentativa de remover um OWNER bloqueada"
            );
            return Err(AppError::RoleEscalation);
        }

        if !self.user_repo.delete_user(&self.pool, id).await? {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_cannot_grant_owner() {
        assert!(matches!(
            check_role_change(Role::Manager, Role::Seller, Role::Owner),
            Err(AppError::RoleEscalation)
        ));
    }

    #[test]
    fn manager_cannot_touch_an_owner() {
        assert!(check_role_change(Role::Manager, Role::Owner, Role::Seller).is_err());
        assert!(check_role_change(Role::Manager, Role::Owner, Role::Owner).is_err());
    }

    #[test]
    fn manager_can_move_between_tenant_roles() {
        assert!(check_role_change(Role::Manager, Role::Seller, Role::Manager).is_ok());
        assert!(check_role_change(Role::Manager, Role::Manager, Role::Seller).is_ok());
    }

    #[test]
    fn owner_can_assign_anything() {
        assert!(check_role_change(Role::Owner, Role::Seller, Role::Owner).is_ok());
        assert!(check_role_change(Role::Owner, Role::Owner, Role::Seller).is_ok());
    }

    // ---
    // Com banco
    // ---

    async fn seed_establishment(pool: &PgPool, cpf_cnpj: &str) -> i64 {
        let endereco_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO enderecos (logradouro, numero, bairro, cidade, uf, cep)
             VALUES ('Rua A', 1, 'Centro', 'Curitiba', 'PR', '80000-000') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query_scalar::<_, i64>(
            "INSERT INTO estabelecimentos (razao_social, cpf_cnpj, endereco_id)
             VALUES ('Loja', $1, $2) RETURNING id",
        )
        .bind(cpf_cnpj)
        .bind(endereco_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_user(pool: &PgPool, email: &str, role: Role, estabelecimento_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (nome, sobrenome, email, password, role, estabelecimento_id)
             VALUES ('A', 'B', $1, 'hash', $2, $3) RETURNING id",
        )
        .bind(email)
        .bind(role.as_str())
        .bind(estabelecimento_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn caller(user_id: i64, role: Role) -> Caller {
        Caller {
            user_id,
            email: "quem@chama.com".into(),
            role,
        }
    }

    fn update_payload(email: &str, role: Role, estabelecimento_id: Option<i64>) -> UpdateUserPayload {
        UpdateUserPayload {
            nome: "Novo".into(),
            sobrenome: "Nome".into(),
            email: email.into(),
            role,
            estabelecimento_id,
        }
    }

    fn service(pool: PgPool) -> UserService {
        UserService::new(UserRepository::new(pool.clone()), pool)
    }

    async fn count_users(pool: &PgPool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore = "requer DATABASE_URL apontando para um Postgres"]
    async fn manager_cannot_delete_an_owner(pool: PgPool) {
        let loja = seed_establishment(&pool, "52998224725").await;
        let owner = seed_user(&pool, "dono@loja.com", Role::Owner, loja).await;
        let manager = seed_user(&pool, "gerente@loja.com", Role::Manager, loja).await;
        let svc = service(pool.clone());

        let result = svc
            .delete(&caller(manager, Role::Manager), TenantScope::Establishment(loja), owner)
            .await;
        assert!(matches!(result, Err(AppError::RoleEscalation)));
        assert_eq!(count_users(&pool).await, 2);

        svc.delete(&caller(owner, Role::Owner), TenantScope::Global, manager)
            .await
            .unwrap();
        assert_eq!(count_users(&pool).await, 1);
    }

    #[sqlx::test]
    #[ignore = "requer DATABASE_URL apontando para um Postgres"]
    async fn manager_only_sees_own_establishment(pool: PgPool) {
        let loja_a = seed_establishment(&pool, "52998224725").await;
        let loja_b = seed_establishment(&pool, "11144477735").await;
        let manager = seed_user(&pool, "gerente@a.com", Role::Manager, loja_a).await;
        seed_user(&pool, "vendedor@a.com", Role::Seller, loja_a).await;
        seed_user(&pool, "vendedor@b.com", Role::Seller, loja_b).await;
        let svc = service(pool);

        let listed = svc.list(TenantScope::Establishment(loja_a)).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|u| u.estabelecimento_id == loja_a));
        assert!(listed.iter().any(|u| u.id == manager));

        assert_eq!(svc.list(TenantScope::Global).await.unwrap().len(), 3);
    }

    #[sqlx::test]
    #[ignore = "requer DATABASE_URL apontando para um Postgres"]
    async fn other_tenant_users_are_forbidden_not_missing(pool: PgPool) {
        let loja_a = seed_establishment(&pool, "52998224725").await;
        let loja_b = seed_establishment(&pool, "11144477735").await;
        let manager = seed_user(&pool, "gerente@a.com", Role::Manager, loja_a).await;
        let alheio = seed_user(&pool, "vendedor@b.com", Role::Seller, loja_b).await;
        let svc = service(pool.clone());
        let scope = TenantScope::Establishment(loja_a);
        let quem = caller(manager, Role::Manager);

        assert!(matches!(svc.get(scope, alheio).await, Err(AppError::AccessDenied)));
        assert!(matches!(
            svc.update(&quem, scope, alheio, &update_payload("x@b.com", Role::Seller, None))
                .await,
            Err(AppError::AccessDenied)
        ));
        assert!(matches!(
            svc.delete(&quem, scope, alheio).await,
            Err(AppError::AccessDenied)
        ));
        assert!(matches!(svc.get(scope, 9_999).await, Err(AppError::UserNotFound)));
        assert_eq!(count_users(&pool).await, 2);
    }

    #[sqlx::test]
    #[ignore = "requer DATABASE_URL apontando para um Postgres"]
    async fn manager_update_keeps_user_in_own_establishment(pool: PgPool) {
        let loja_a = seed_establishment(&pool, "52998224725").await;
        let loja_b = seed_establishment(&pool, "11144477735").await;
        let manager = seed_user(&pool, "gerente@a.com", Role::Manager, loja_a).await;
        let vendedor = seed_user(&pool, "vendedor@a.com", Role::Seller, loja_a).await;
        let svc = service(pool);

        let updated = svc
            .update(
                &caller(manager, Role::Manager),
                TenantScope::Establishment(loja_a),
                vendedor,
                &update_payload("vendedor@a.com", Role::Manager, Some(loja_b)),
            )
            .await
            .unwrap();

        assert_eq!(updated.estabelecimento_id, loja_a);
        assert_eq!(updated.role, Role::Manager);
        assert_eq!(updated.nome, "Novo");
    }

    #[sqlx::test]
    #[ignore = "requer DATABASE_URL apontando para um Postgres"]
    async fn duplicate_email_on_update_is_a_conflict(pool: PgPool) {
        let loja = seed_establishment(&pool, "52998224725").await;
        let owner = seed_user(&pool, "dono@loja.com", Role::Owner, loja).await;
        let vendedor = seed_user(&pool, "vendedor@loja.com", Role::Seller, loja).await;

        let result = service(pool)
            .update(
                &caller(owner, Role::Owner),
                TenantScope::Global,
                vendedor,
                &update_payload("dono@loja.com", Role::Seller, None),
            )
            .await;
        assert!(matches!(result, Err(AppError::EmailAlreadyExists)));
    }
}
