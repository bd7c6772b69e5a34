// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, middleware::auth::Identity, models::auth::Role};

/// Quem está chamando, já com o papel validado.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl Caller {
    pub fn from_identity(identity: Option<&Identity>) -> Result<Self, AppError> {
        let identity = identity.ok_or(AppError::MissingRole)?;
        let role = identity.role.parse::<Role>().map_err(|e| {
            tracing::warn!(user_id = identity.user_id, "Token com papel inválido: {}", e);
            AppError::InvalidRole
        })?;

        Ok(Self {
            user_id: identity.user_id,
            email: identity.email.clone(),
            role,
        })
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

/// 1. O Trait que define a lista de papéis aceitos por uma rota
pub trait RoleSet: Send + Sync + 'static {
    fn allowed() -> &'static [Role];
}

pub fn check_role(role: Role, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<R> {
    pub caller: Caller,
    _marker: PhantomData<fn() -> R>,
}

// 3. Implementação do FromRequestParts
impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_identity(parts.extensions.get::<Identity>())?;

        if let Err(e) = check_role(caller.role, R::allowed()) {
            tracing::warn!(
                user_id = caller.user_id,
                role = %caller.role,
                path = %parts.uri.path(),
                "Papel sem permissão para a rota"
            );
            return Err(e);
        }

        Ok(RequireRole {
            caller,
            _marker: PhantomData,
        })
    }
}

// ---
// LISTAS DE PAPÉIS (TIPOS)
// ---

pub struct OwnerOnly;
impl RoleSet for OwnerOnly {
    fn allowed() -> &'static [Role] {
        &[Role::Owner]
    }
}

pub struct OwnerOrManager;
impl RoleSet for OwnerOrManager {
    fn allowed() -> &'static [Role] {
        &[Role::Owner, Role::Manager]
    }
}

pub struct AnyRole;
impl RoleSet for AnyRole {
    fn allowed() -> &'static [Role] {
        &[Role::Owner, Role::Manager, Role::Seller]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: &str) -> Identity {
        Identity {
            user_id: 9,
            email: "x@y.com".into(),
            role: role.into(),
        }
    }

    #[test]
    fn missing_identity_means_missing_role() {
        assert!(matches!(Caller::from_identity(None), Err(AppError::MissingRole)));
    }

    #[test]
    fn unknown_role_string_is_rejected() {
        let id = identity("ADMIN");
        assert!(matches!(Caller::from_identity(Some(&id)), Err(AppError::InvalidRole)));
        let id = identity("");
        assert!(matches!(Caller::from_identity(Some(&id)), Err(AppError::InvalidRole)));
    }

    #[test]
    fn role_from_token_is_case_insensitive() {
        let id = identity("manager");
        let caller = Caller::from_identity(Some(&id)).unwrap();
        assert_eq!(caller.role, Role::Manager);
        assert!(!caller.is_owner());
    }

    #[test]
    fn allow_lists() {
        assert!(check_role(Role::Owner, OwnerOnly::allowed()).is_ok());
        assert!(matches!(
            check_role(Role::Manager, OwnerOnly::allowed()),
            Err(AppError::PermissionDenied)
        ));
        assert!(check_role(Role::Manager, OwnerOrManager::allowed()).is_ok());
        assert!(check_role(Role::Seller, OwnerOrManager::allowed()).is_err());
        assert!(check_role(Role::Seller, AnyRole::allowed()).is_ok());
    }
}
