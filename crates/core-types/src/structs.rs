use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the factory extract: actual 2024 intake and forecast 2025
/// purchasing per business unit.
///
/// Numeric fields are `Option` because the loader coerces malformed text to
/// a missing marker rather than failing the whole extract. A missing value
/// is excluded from aggregates, never treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryRecord {
    pub business_unit: String,
    pub amount_2024: Option<Decimal>,
    pub forecast_2025: Option<Decimal>,
}

/// One row of the supplier extract. A supplier may appear once per
/// sub-category, so `supplier_name` is not unique across rows.
///
/// The per-site columns are the fixed plant breakdown of the group
/// (Huifeng, Tongmeng, Suzhou); the `amount_2024`/`budget_2025` columns are
/// the cross-site totals the extract already carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub supplier_name: String,
    pub category: String,
    pub sub_category: String,
    pub amount_2024: Option<Decimal>,
    pub budget_2025: Option<Decimal>,
    pub huifeng_2024: Option<Decimal>,
    pub tongmeng_2024: Option<Decimal>,
    pub suzhou_2024: Option<Decimal>,
    pub huifeng_2025: Option<Decimal>,
    pub tongmeng_2025: Option<Decimal>,
    pub suzhou_2025: Option<Decimal>,
}

/// One row of the category extract, at sub-category grain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category: String,
    pub sub_category: String,
    pub spend_2024: Option<Decimal>,
    pub spend_2025: Option<Decimal>,
}
