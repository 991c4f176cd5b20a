//! Lenient numeric coercion for extract cells.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Coerces a raw cell to a Decimal: strips whitespace, thousands
/// separators and a trailing percent sign. Anything that still fails to
/// parse (including an empty cell) is a missing value, not an error.
pub fn coerce_decimal(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().trim_end_matches('%').replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// serde adapter over [`coerce_decimal`] for the loader's row structs.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(coerce_decimal(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(coerce_decimal("1,234,567.89"), Some(dec!(1234567.89)));
    }

    #[test]
    fn strips_trailing_percent() {
        assert_eq!(coerce_decimal("13%"), Some(dec!(13)));
        assert_eq!(coerce_decimal(" -9.5% "), Some(dec!(-9.5)));
    }

    #[test]
    fn plain_numbers_pass_through() {
        assert_eq!(coerce_decimal("42"), Some(dec!(42)));
        assert_eq!(coerce_decimal("0"), Some(dec!(0)));
    }

    #[test]
    fn garbage_and_blanks_are_missing() {
        assert_eq!(coerce_decimal(""), None);
        assert_eq!(coerce_decimal("   "), None);
        assert_eq!(coerce_decimal("n/a"), None);
        assert_eq!(coerce_decimal("12a3"), None);
    }
}
