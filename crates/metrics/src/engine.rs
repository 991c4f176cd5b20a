use crate::category::{
    self, CategoryDetail, CategorySummary, DeclineAlert, SubCategoryAnalysis,
};
use crate::concentration;
use crate::error::MetricsError;
use crate::factory::{self, FactoryOverview};
use crate::ranking;
use crate::supplier::{
    self, ConcentrationOverview, SupplierAnalysis, TierSummary, TopMovement,
};
use configuration::MetricsSettings;
use core_types::{CategoryRecord, FactoryRecord, SupplierRecord};
use rust_decimal::Decimal;
use tracing::debug;

/// A stateless calculator over a snapshot of procurement records.
///
/// The engine holds only validated settings. Every method takes
/// caller-owned records, computes derived figures from scratch and returns
/// them; no data is retained or mutated between calls, so a fresh snapshot
/// can be supplied on every invocation.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    settings: MetricsSettings,
}

impl MetricsEngine {
    /// Creates a new engine after validating the settings.
    pub fn new(settings: MetricsSettings) -> Result<Self, MetricsError> {
        if settings.ranking_size == 0 {
            return Err(MetricsError::InvalidParameter(
                "ranking_size must be greater than 0".to_string(),
            ));
        }
        if settings.concentration_top_k == 0 {
            return Err(MetricsError::InvalidParameter(
                "concentration_top_k must be greater than 0".to_string(),
            ));
        }
        if settings.high_dependency_threshold <= Decimal::ZERO
            || settings.high_dependency_threshold >= Decimal::ONE
        {
            return Err(MetricsError::InvalidParameter(
                "high_dependency_threshold must be a fraction in (0, 1)".to_string(),
            ));
        }
        if settings.min_growth_base < Decimal::ZERO {
            return Err(MetricsError::InvalidParameter(
                "min_growth_base must not be negative".to_string(),
            ));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MetricsSettings {
        &self.settings
    }

    // --- Factory view ---

    /// Per-unit growth and share, with the extract's total row excluded.
    pub fn analyze_factories(
        &self,
        records: &[FactoryRecord],
    ) -> Result<FactoryOverview, MetricsError> {
        debug!(rows = records.len(), "analyzing factory extract");
        factory::analyze_factories(records, &self.settings.total_row_label)
    }

    // --- Supplier views ---

    /// Growth, share and quartile tier for every supplier row.
    pub fn analyze_suppliers(
        &self,
        records: &[SupplierRecord],
    ) -> Result<Vec<SupplierAnalysis>, MetricsError> {
        debug!(rows = records.len(), "analyzing supplier extract");
        supplier::analyze_suppliers(records)
    }

    /// Headline concentration figures over 2024 amounts.
    pub fn supplier_overview(
        &self,
        records: &[SupplierRecord],
    ) -> Result<ConcentrationOverview, MetricsError> {
        supplier::concentration_overview(records, self.settings.high_dependency_threshold)
    }

    /// Concentration ratio at the configured k, over 2024 amounts.
    pub fn supplier_concentration(
        &self,
        records: &[SupplierRecord],
    ) -> Result<Decimal, MetricsError> {
        concentration::concentration_ratio(
            records,
            |record| record.amount_2024,
            self.settings.concentration_top_k,
            "supplier",
        )
    }

    /// Top-N suppliers per year and the movement between the two lists.
    pub fn top_supplier_movement(
        &self,
        records: &[SupplierRecord],
    ) -> Result<TopMovement, MetricsError> {
        supplier::top_movement(records, self.settings.ranking_size)
    }

    /// Per-tier aggregates over derived supplier records.
    pub fn tier_summaries(
        &self,
        analyses: &[SupplierAnalysis],
    ) -> Result<Vec<TierSummary>, MetricsError> {
        supplier::tier_summaries(analyses)
    }

    /// Suppliers with the highest ordinary growth rate, sentinels and
    /// sub-threshold bases excluded.
    pub fn top_growth_suppliers(
        &self,
        analyses: &[SupplierAnalysis],
    ) -> Result<Vec<SupplierAnalysis>, MetricsError> {
        let key = supplier::supplier_rate_key(self.settings.min_growth_base);
        let top = ranking::top_n(analyses, key, self.settings.ranking_size)?;
        Ok(top.into_iter().cloned().collect())
    }

    /// Suppliers with the lowest ordinary growth rate, same exclusions as
    /// [`MetricsEngine::top_growth_suppliers`].
    pub fn bottom_growth_suppliers(
        &self,
        analyses: &[SupplierAnalysis],
    ) -> Result<Vec<SupplierAnalysis>, MetricsError> {
        let key = supplier::supplier_rate_key(self.settings.min_growth_base);
        let bottom = ranking::bottom_n(analyses, key, self.settings.ranking_size)?;
        Ok(bottom.into_iter().cloned().collect())
    }

    /// Mean ordinary growth rate across the supplier base; `None` when no
    /// row has a comparable rate.
    pub fn mean_supplier_growth(&self, records: &[SupplierRecord]) -> Option<Decimal> {
        supplier::mean_growth(records)
    }

    // --- Category views ---

    /// Derived growth for every sub-category row.
    pub fn analyze_sub_categories(&self, records: &[CategoryRecord]) -> Vec<SubCategoryAnalysis> {
        category::analyze_sub_categories(records)
    }

    /// Category-level aggregates with shares, deltas and quadrants.
    pub fn summarize_categories(
        &self,
        records: &[CategoryRecord],
    ) -> Result<Vec<CategorySummary>, MetricsError> {
        debug!(rows = records.len(), "summarizing category extract");
        category::summarize_categories(records)
    }

    /// Drill-down statistics for one category.
    pub fn category_detail(
        &self,
        records: &[CategoryRecord],
        name: &str,
    ) -> Result<CategoryDetail, MetricsError> {
        category::category_detail(records, name, self.settings.swing_threshold)
    }

    /// Sub-categories with the highest ordinary growth rate, sentinels and
    /// sub-threshold bases excluded.
    pub fn top_growth_sub_categories(
        &self,
        records: &[CategoryRecord],
    ) -> Result<Vec<SubCategoryAnalysis>, MetricsError> {
        let rows = category::analyze_sub_categories(records);
        let top = ranking::top_n(&rows, self.sub_category_rate_key(), self.settings.ranking_size)?;
        Ok(top.into_iter().cloned().collect())
    }

    /// Sub-categories with the lowest ordinary growth rate, same exclusions
    /// as [`MetricsEngine::top_growth_sub_categories`].
    pub fn bottom_growth_sub_categories(
        &self,
        records: &[CategoryRecord],
    ) -> Result<Vec<SubCategoryAnalysis>, MetricsError> {
        let rows = category::analyze_sub_categories(records);
        let bottom =
            ranking::bottom_n(&rows, self.sub_category_rate_key(), self.settings.ranking_size)?;
        Ok(bottom.into_iter().cloned().collect())
    }

    /// The risk screen over sub-category declines.
    pub fn significant_declines(&self, records: &[CategoryRecord]) -> Vec<DeclineAlert> {
        category::significant_declines(
            records,
            self.settings.decline_rate_threshold,
            self.settings.decline_base_threshold,
        )
    }

    fn sub_category_rate_key(&self) -> impl Fn(&SubCategoryAnalysis) -> Option<Decimal> {
        let min_base = self.settings.min_growth_base;
        move |row| ranking::rankable_rate(row.spend_2024, row.growth.map(|g| g.rate), min_base)
    }
}
