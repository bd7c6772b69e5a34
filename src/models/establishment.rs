// src/models/establishment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const UF_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PE", "PI", "PR", "RJ", "RN", "RO", "RR", "RS", "SC", "SE", "SP", "TO",
];

fn validate_uf(uf: &str) -> Result<(), ValidationError> {
    if UF_CODES.contains(&uf) {
        return Ok(());
    }
    let mut err = ValidationError::new("uf");
    err.message = Some("UF inválida.".into());
    Err(err)
}

// ---
// Endereço
// ---
// Pertence a um único estabelecimento. Também é o formato de entrada.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate, ToSchema)]
pub struct Address {
    #[validate(length(min = 1, max = 100, message = "O logradouro é obrigatório."))]
    pub logradouro: String,
    #[validate(length(max = 50))]
    pub complemento: Option<String>,
    #[validate(range(min = 0, message = "O número não pode ser negativo."))]
    pub numero: i32,
    #[validate(length(min = 1, max = 50, message = "O bairro é obrigatório."))]
    pub bairro: String,
    #[validate(length(min = 1, max = 50, message = "A cidade é obrigatória."))]
    pub cidade: String,
    #[validate(custom(function = "validate_uf"))]
    #[schema(example = "SP")]
    pub uf: String,
    #[validate(length(min = 1, max = 9, message = "O CEP é obrigatório."))]
    #[schema(example = "01001-000")]
    pub cep: String,
}

// ---
// Estabelecimento (o tenant)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Establishment {
    pub id: i64,
    pub razao_social: String,
    pub cpf_cnpj: String,
    pub endereco_id: i64,
    #[sqlx(flatten)]
    pub endereco: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EstablishmentPayload {
    #[validate(length(min = 1, max = 255, message = "A razão social é obrigatória."))]
    pub razao_social: String,
    #[schema(example = "11.222.333/0001-81")]
    pub cpf_cnpj: String,
    #[validate(nested)]
    pub endereco: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(uf: &str) -> EstablishmentPayload {
        serde_json::from_value(serde_json::json!({
            "razao_social": "Loja Centro LTDA",
            "cpf_cnpj": "11.222.333/0001-81",
            "endereco": {
                "logradouro": "Rua das Flores",
                "numero": 123,
                "bairro": "Centro",
                "cidade": "São Paulo",
                "uf": uf,
                "cep": "01001-000"
            }
        }))
        .unwrap()
    }

    #[test]
    fn complemento_is_optional() {
        let p = payload("SP");
        assert!(p.endereco.complemento.is_none());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn unknown_state_code_fails_nested_validation() {
        assert!(payload("XX").validate().is_err());
        assert!(payload("sp").validate().is_err());
    }
}
