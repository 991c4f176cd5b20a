use crate::concentration;
use crate::error::MetricsError;
use crate::growth::{self, Growth};
use core_types::FactoryRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A factory row with its derived figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryAnalysis {
    pub business_unit: String,
    pub amount_2024: Option<Decimal>,
    pub forecast_2025: Option<Decimal>,
    pub growth: Option<Growth>,
    /// Share of the 2024 group total, total row excluded.
    pub share_2024_pct: Option<Decimal>,
}

/// Group totals recomputed from the per-unit rows, not read from the
/// extract's own total row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryTotals {
    pub amount_2024: Decimal,
    pub forecast_2025: Decimal,
    pub growth: Growth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryOverview {
    pub units: Vec<FactoryAnalysis>,
    pub totals: FactoryTotals,
}

/// Derives per-unit growth and share figures from the factory extract.
///
/// The row whose business unit equals `total_row_label` is the extract's
/// pre-aggregated total and is excluded from every per-unit figure; the
/// group totals are summed from the remaining rows instead.
pub fn analyze_factories(
    records: &[FactoryRecord],
    total_row_label: &str,
) -> Result<FactoryOverview, MetricsError> {
    let units: Vec<&FactoryRecord> = records
        .iter()
        .filter(|record| record.business_unit != total_row_label)
        .collect();
    if units.is_empty() {
        return Err(MetricsError::NotEnoughData(
            "analyze factories: no rows besides the total row".to_string(),
        ));
    }

    let shares = concentration::share_of_total(&units, |record| record.amount_2024, "factory")?;

    let analyses = units
        .iter()
        .zip(shares)
        .map(|(record, share)| FactoryAnalysis {
            business_unit: record.business_unit.clone(),
            amount_2024: record.amount_2024,
            forecast_2025: record.forecast_2025,
            growth: growth::growth_opt(record.amount_2024, record.forecast_2025),
            share_2024_pct: share,
        })
        .collect();

    let amount_2024: Decimal = units.iter().filter_map(|record| record.amount_2024).sum();
    let forecast_2025: Decimal = units.iter().filter_map(|record| record.forecast_2025).sum();
    let totals = FactoryTotals {
        amount_2024,
        forecast_2025,
        growth: growth::growth(amount_2024, forecast_2025),
    };

    Ok(FactoryOverview {
        units: analyses,
        totals,
    })
}
