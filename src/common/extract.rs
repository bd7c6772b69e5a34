// src/common/extract.rs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json,
};
use validator::Validate;

use crate::common::error::AppError;

/// Extrai o corpo JSON, trocando a rejeição do axum pelo nosso erro 400.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result.map(|Json(v)| v).map_err(|err| {
        tracing::debug!("Corpo rejeitado: {}", err.body_text());
        AppError::MalformedBody(err.body_text())
    })
}

/// Extrai e valida com o `validator`.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate()?;
    Ok(value)
}

pub fn extract_id(result: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    result.map(|Path(id)| id).map_err(|_| AppError::InvalidId)
}
