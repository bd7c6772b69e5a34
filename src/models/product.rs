// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    pub nome: String,
    pub sku: String,
    pub descricao: String,
    #[schema(value_type = f64, example = 19.9)]
    pub valor: Decimal,
    #[schema(value_type = f64, example = 10.5)]
    pub estoque: Decimal,
    pub estabelecimento_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Limites das colunas: NUMERIC(10,2) e NUMERIC(10,3)
const VALOR_SCALE: u32 = 2;
const ESTOQUE_SCALE: u32 = 3;
const VALOR_LIMIT: i64 = 100_000_000;
const ESTOQUE_LIMIT: i64 = 10_000_000;

/// Mesmo arredondamento que o Postgres aplica ao gravar em NUMERIC.
fn round_to_column(val: Decimal, scale: u32) -> Decimal {
    val.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

fn validate_amount(val: &Decimal, scale: u32, limit: i64) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    // Compara já arredondado: 99999999.995 vira 100000000.00 no banco
    if round_to_column(*val, scale) >= Decimal::from(limit) {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &limit);
        err.message = Some("O valor excede o limite permitido.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_valor(val: &Decimal) -> Result<(), ValidationError> {
    validate_amount(val, VALOR_SCALE, VALOR_LIMIT)
}

fn validate_estoque(val: &Decimal) -> Result<(), ValidationError> {
    validate_amount(val, ESTOQUE_SCALE, ESTOQUE_LIMIT)
}

// Entrada de criação e de atualização (PUT substitui tudo)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 150, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(length(min = 1, max = 50, message = "O SKU é obrigatório."))]
    pub sku: String,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub descricao: String,
    #[validate(custom(function = "validate_valor"))]
    #[schema(value_type = f64)]
    pub valor: Decimal,
    #[validate(custom(function = "validate_estoque"))]
    #[schema(value_type = f64)]
    pub estoque: Decimal,
    // Obrigatório para OWNER; para os demais é sempre o próprio estabelecimento
    pub estabelecimento_id: Option<i64>,
}

impl ProductPayload {
    /// Ajusta para a precisão das colunas NUMERIC(10,2) e NUMERIC(10,3).
    pub fn normalized_amounts(&self) -> (Decimal, Decimal) {
        (
            round_to_column(self.valor, VALOR_SCALE),
            round_to_column(self.estoque, ESTOQUE_SCALE),
        )
    }
}

// Filtros crus vindos da query string. Valores malformados são ignorados.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// SKU exato
    pub sku: Option<String>,
    /// Trecho da descrição (sem diferenciar maiúsculas)
    pub descricao: Option<String>,
    /// Valor exato, aceita vírgula ou ponto
    pub valor: Option<String>,
    /// dd/mm/aaaa
    pub data_inicial: Option<String>,
    /// dd/mm/aaaa (inclusivo até 23:59:59)
    pub data_final: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductUpdatedResponse {
    pub message: String,
    pub produto: Product,
}
