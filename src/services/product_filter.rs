// src/services/product_filter.rs
//
// Converte a query string de /products em predicados tipados.
// Filtro malformado é ignorado em silêncio, nunca vira erro.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::{db::ProductPredicate, middleware::tenancy::TenantScope, models::product::ProductQuery};

const DATE_FORMAT: &str = "%d/%m/%Y";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Aceita "19,90" e "19.90".
pub fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&raw.trim().replace(',', ".")).ok()
}

/// Intervalo inclusivo: início às 00:00:00, fim às 23:59:59 (UTC).
/// Só vale se as duas datas forem válidas.
pub fn parse_date_range(start: &str, end: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT).ok()?;
    let end = NaiveDate::parse_from_str(end.trim(), DATE_FORMAT).ok()?;

    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(23, 59, 59)?.and_utc(),
    ))
}

pub fn build_predicates(scope: TenantScope, query: &ProductQuery) -> Vec<ProductPredicate> {
    let mut predicates = Vec::new();

    // O filtro de estabelecimento vem sempre primeiro
    if let Some(estabelecimento_id) = scope.establishment_filter() {
        predicates.push(ProductPredicate::Establishment(estabelecimento_id));
    }

    if let Some(sku) = non_empty(&query.sku) {
        predicates.push(ProductPredicate::Sku(sku.to_string()));
    }

    if let Some(descricao) = non_empty(&query.descricao) {
        predicates.push(ProductPredicate::DescriptionContains(descricao.to_string()));
    }

    if let Some(valor) = non_empty(&query.valor).and_then(parse_price) {
        predicates.push(ProductPredicate::Price(valor));
    }

    if let (Some(start), Some(end)) = (non_empty(&query.data_inicial), non_empty(&query.data_final)) {
        if let Some((start, end)) = parse_date_range(start, end) {
            predicates.push(ProductPredicate::CreatedBetween(start, end));
        }
    }

    predicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query() -> ProductQuery {
        ProductQuery::default()
    }

    #[test]
    fn non_owner_scope_always_gets_establishment_first() {
        let q = ProductQuery {
            sku: Some("ABC".into()),
            ..query()
        };
        let predicates = build_predicates(TenantScope::Establishment(4), &q);
        assert_eq!(
            predicates,
            vec![
                ProductPredicate::Establishment(4),
                ProductPredicate::Sku("ABC".into())
            ]
        );
    }

    #[test]
    fn owner_scope_without_filters_has_no_predicates() {
        assert!(build_predicates(TenantScope::Global, &query()).is_empty());
    }

    #[test]
    fn blank_values_are_ignored() {
        let q = ProductQuery {
            sku: Some("   ".into()),
            descricao: Some(String::new()),
            ..query()
        };
        assert!(build_predicates(TenantScope::Global, &q).is_empty());
    }

    #[test]
    fn price_accepts_comma_or_dot() {
        assert_eq!(parse_price("19,90"), Some(Decimal::new(1990, 2)));
        assert_eq!(parse_price("19.90"), Some(Decimal::new(1990, 2)));
        assert_eq!(parse_price("7"), Some(Decimal::new(7, 0)));
    }

    #[test]
    fn malformed_price_is_silently_dropped() {
        let q = ProductQuery {
            valor: Some("dez reais".into()),
            ..query()
        };
        assert!(build_predicates(TenantScope::Global, &q).is_empty());
    }

    #[test]
    fn same_day_range_covers_the_whole_day() {
        let (start, end) = parse_date_range("01/01/2024", "01/01/2024").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap());
    }

    #[test]
    fn malformed_or_partial_dates_are_ignored() {
        assert!(parse_date_range("2024-01-01", "01/01/2024").is_none());
        assert!(parse_date_range("31/02/2024", "01/03/2024").is_none());

        let only_start = ProductQuery {
            data_inicial: Some("01/01/2024".into()),
            ..query()
        };
        assert!(build_predicates(TenantScope::Global, &only_start).is_empty());
    }

    #[test]
    fn all_filters_compose() {
        let q = ProductQuery {
            sku: Some("SKU-1".into()),
            descricao: Some("café".into()),
            valor: Some("10,5".into()),
            data_inicial: Some("01/01/2024".into()),
            data_final: Some("31/01/2024".into()),
        };
        let predicates = build_predicates(TenantScope::Establishment(2), &q);
        assert_eq!(predicates.len(), 5);
        assert_eq!(predicates[0], ProductPredicate::Establishment(2));
        assert_eq!(predicates[3], ProductPredicate::Price(Decimal::new(105, 1)));
        assert!(matches!(predicates[4], ProductPredicate::CreatedBetween(_, _)));
    }
}
