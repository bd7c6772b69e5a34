use sqlx::{Postgres, Transaction};

use crate::common::error::AppError;

// ---
// Tradução de erros do banco
// ---
/// Converte violações de restrição em erros de domínio.
/// É o caminho autoritativo para conflitos: a verificação prévia
/// (`exists`) pode perder a corrida para outra requisição, a restrição não.
pub(crate) fn map_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            return match constraint {
                "users_email_key" => AppError::EmailAlreadyExists,
                "products_sku_key" => AppError::SkuAlreadyExists,
                "estabelecimentos_cpf_cnpj_key" => AppError::TaxIdAlreadyExists,
                other => AppError::UniqueConstraintViolation(other.to_string()),
            };
        }
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.ends_with("estabelecimento_id_fkey") {
                return AppError::UnknownEstablishment;
            }
        }
    }
    e.into()
}

/// Desfaz a transação antes de devolver o erro original.
/// Falha no rollback só é registrada; o erro que importa é `cause`.
pub(crate) async fn rollback(tx: Transaction<'_, Postgres>, cause: &AppError) {
    match tx.rollback().await {
        Ok(()) => tracing::debug!("Transação desfeita: {}", cause),
        Err(e) => tracing::error!("Falha ao desfazer transação após '{}': {}", cause, e),
    }
}
