// src/common/tax_id.rs
//
// CPF (pessoa física, 11 dígitos) e CNPJ (pessoa jurídica, 14 dígitos).

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdKind {
    Cpf,
    Cnpj,
}

/// Remove tudo que não for dígito e valida os dígitos verificadores.
/// Retorna o documento normalizado (apenas dígitos).
pub fn normalize_tax_id(raw: &str) -> Result<(String, TaxIdKind), AppError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let values: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

    let kind = match values.len() {
        11 if is_valid_cpf(&values) => TaxIdKind::Cpf,
        14 if is_valid_cnpj(&values) => TaxIdKind::Cnpj,
        _ => return Err(AppError::InvalidTaxId),
    };

    Ok((digits, kind))
}

fn all_same(values: &[u32]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

// Dígito verificador no padrão módulo 11 usado pela Receita
fn check_digit(values: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

fn is_valid_cpf(values: &[u32]) -> bool {
    if all_same(values) {
        return false;
    }
    let first = check_digit(&values[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&values[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    first == values[9] && second == values[10]
}

fn is_valid_cnpj(values: &[u32]) -> bool {
    if all_same(values) {
        return false;
    }
    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let first = check_digit(&values[..12], &FIRST);
    let second = check_digit(&values[..13], &SECOND);
    first == values[12] && second == values[13]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_cpf_is_stripped_to_digits() {
        let (doc, kind) = normalize_tax_id("529.982.247-25").unwrap();
        assert_eq!(doc, "52998224725");
        assert_eq!(kind, TaxIdKind::Cpf);
    }

    #[test]
    fn formatted_cnpj_is_stripped_to_digits() {
        let (doc, kind) = normalize_tax_id("11.222.333/0001-81").unwrap();
        assert_eq!(doc, "11222333000181");
        assert_eq!(kind, TaxIdKind::Cnpj);
    }

    #[test]
    fn wrong_check_digits_are_rejected() {
        assert!(matches!(normalize_tax_id("529.982.247-24"), Err(AppError::InvalidTaxId)));
        assert!(matches!(normalize_tax_id("11222333000180"), Err(AppError::InvalidTaxId)));
    }

    #[test]
    fn repeated_digits_are_rejected() {
        assert!(normalize_tax_id("111.111.111-11").is_err());
        assert!(normalize_tax_id("00000000000000").is_err());
    }

    #[test]
    fn other_lengths_are_rejected() {
        assert!(normalize_tax_id("").is_err());
        assert!(normalize_tax_id("1234567890").is_err());
        assert!(normalize_tax_id("123456789012").is_err());
        assert!(normalize_tax_id("abc").is_err());
    }

    #[test]
    fn more_known_documents() {
        assert!(normalize_tax_id("111.444.777-35").is_ok());
        assert!(normalize_tax_id("45.723.174/0001-10").is_ok());
        assert!(normalize_tax_id("04.252.011/0001-10").is_ok());
    }
}
