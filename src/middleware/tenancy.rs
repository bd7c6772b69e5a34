// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::Identity, rbac::Caller},
};

// O escopo de dados de quem chama.
// OWNER enxerga todos os estabelecimentos; os demais só o próprio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    Global,
    Establishment(i64),
}

impl TenantScope {
    /// Filtro implícito para listagens.
    pub fn establishment_filter(&self) -> Option<i64> {
        match self {
            TenantScope::Global => None,
            TenantScope::Establishment(id) => Some(*id),
        }
    }

    /// Leitura/escrita de um registro já existente.
    /// Registro de outro estabelecimento é acesso negado, não "não encontrado".
    pub fn ensure_access(&self, estabelecimento_id: i64) -> Result<(), AppError> {
        match self {
            TenantScope::Global => Ok(()),
            TenantScope::Establishment(own) if *own == estabelecimento_id => Ok(()),
            TenantScope::Establishment(own) => {
                tracing::warn!(
                    caller_estabelecimento = own,
                    target_estabelecimento = estabelecimento_id,
                    "Acesso entre estabelecimentos bloqueado"
                );
                Err(AppError::AccessDenied)
            }
        }
    }

    /// Estabelecimento a gravar. Fora do escopo global, o valor enviado
    /// pelo cliente é ignorado e substituído pelo próprio.
    pub fn resolve_establishment(&self, requested: Option<i64>) -> Option<i64> {
        match self {
            TenantScope::Global => requested,
            TenantScope::Establishment(own) => {
                if requested.is_some_and(|r| r != *own) {
                    tracing::debug!(requested = ?requested, own, "estabelecimento_id sobrescrito");
                }
                Some(*own)
            }
        }
    }
}

impl<S> FromRequestParts<S> for TenantScope
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_identity(parts.extensions.get::<Identity>())?;

        if caller.is_owner() {
            return Ok(TenantScope::Global);
        }

        let app_state = AppState::from_ref(state);

        // Usuário do token não existe mais: o token não vale
        let estabelecimento_id = app_state
            .user_repo
            .find_establishment_id(caller.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(TenantScope::Establishment(estabelecimento_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_scope_has_no_filter_and_full_access() {
        let scope = TenantScope::Global;
        assert_eq!(scope.establishment_filter(), None);
        assert!(scope.ensure_access(1).is_ok());
        assert!(scope.ensure_access(99).is_ok());
    }

    #[test]
    fn establishment_scope_denies_other_tenants() {
        let scope = TenantScope::Establishment(1);
        assert_eq!(scope.establishment_filter(), Some(1));
        assert!(scope.ensure_access(1).is_ok());
        assert!(matches!(scope.ensure_access(2), Err(AppError::AccessDenied)));
    }

    #[test]
    fn payload_establishment_is_overridden_outside_global_scope() {
        let scope = TenantScope::Establishment(5);
        assert_eq!(scope.resolve_establishment(Some(8)), Some(5));
        assert_eq!(scope.resolve_establishment(None), Some(5));

        assert_eq!(TenantScope::Global.resolve_establishment(Some(8)), Some(8));
        assert_eq!(TenantScope::Global.resolve_establishment(None), None);
    }
}
