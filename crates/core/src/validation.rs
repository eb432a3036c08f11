//! Input validation utilities.
//!
//! Operator input is cleaned up here before it is used to build a request URL.

use crate::constants::MAX_TAX_ID_LEN;
use crate::error::ValidationError;

/// Normalises a subject tax ID typed by an operator.
///
/// Mask characters (`.`, `-`, `/`) and whitespace are removed, so `123.456.789-03` becomes
/// `12345678903`. The tax ID ends up as the final segment of the report URL, which is why
/// anything other than ASCII digits is rejected:
/// - Rejects empty input (after stripping the mask)
/// - Rejects any remaining non-digit character
/// - Bounds the length to a CNPJ (14 digits)
///
/// # Errors
///
/// Returns a `ValidationError` describing the first rule the input breaks.
pub fn normalize_tax_id(input: &str) -> Result<String, ValidationError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(ValidationError::EmptyTaxId);
    }

    if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NonDigitTaxId);
    }

    if cleaned.len() > MAX_TAX_ID_LEN {
        return Err(ValidationError::TaxIdTooLong {
            max: MAX_TAX_ID_LEN,
        });
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_cpf_mask() {
        assert_eq!(normalize_tax_id("123.456.789-03").unwrap(), "12345678903");
        assert_eq!(normalize_tax_id(" 12345678903 ").unwrap(), "12345678903");
    }

    #[test]
    fn test_strips_cnpj_mask() {
        assert_eq!(
            normalize_tax_id("12.345.678/0001-95").unwrap(),
            "12345678000195"
        );
    }

    #[test]
    fn test_short_ids_are_accepted() {
        assert_eq!(normalize_tax_id("000").unwrap(), "000");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(normalize_tax_id(""), Err(ValidationError::EmptyTaxId));
        assert_eq!(normalize_tax_id(" .-"), Err(ValidationError::EmptyTaxId));
    }

    #[test]
    fn test_rejects_path_characters() {
        assert_eq!(
            normalize_tax_id("../token"),
            Err(ValidationError::NonDigitTaxId)
        );
        assert_eq!(
            normalize_tax_id("123?x=1"),
            Err(ValidationError::NonDigitTaxId)
        );
    }

    #[test]
    fn test_rejects_too_long() {
        assert_eq!(
            normalize_tax_id("123456789012345"),
            Err(ValidationError::TaxIdTooLong { max: 14 })
        );
    }
}
