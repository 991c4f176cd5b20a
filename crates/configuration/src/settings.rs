use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataFiles,
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// Locations of the three tabular extracts the loader reads.
#[derive(Debug, Clone, Deserialize)]
pub struct DataFiles {
    /// Factory summary: one row per business unit plus a designated total row.
    #[serde(default = "default_factory_file")]
    pub factory: PathBuf,
    /// Supplier summary: one row per supplier per sub-category.
    #[serde(default = "default_supplier_file")]
    pub supplier: PathBuf,
    /// Category spend at sub-category grain.
    #[serde(default = "default_category_file")]
    pub category: PathBuf,
}

/// Tunable parameters of the metrics engine.
///
/// Defaults match the thresholds the dashboard has always used; they are
/// validated by `MetricsEngine::new`, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// A supplier whose share of total spend exceeds this fraction counts
    /// as a high-dependency supplier.
    #[serde(default = "default_high_dependency_threshold")]
    pub high_dependency_threshold: Decimal,

    /// Minimum prior-year base for a row to participate in growth-rate
    /// rankings, keeping tiny denominators out of the top/bottom lists.
    #[serde(default = "default_min_growth_base")]
    pub min_growth_base: Decimal,

    /// k for the headline concentration ratio.
    #[serde(default = "default_concentration_top_k")]
    pub concentration_top_k: usize,

    /// n for top-N / bottom-N rankings.
    #[serde(default = "default_ranking_size")]
    pub ranking_size: usize,

    /// A sub-category with growth below this rate (percent) and a 2024 base
    /// above `decline_base_threshold` is flagged as a significant decline.
    #[serde(default = "default_decline_rate_threshold")]
    pub decline_rate_threshold: Decimal,
    #[serde(default = "default_decline_base_threshold")]
    pub decline_base_threshold: Decimal,

    /// Absolute growth rate (percent) beyond which a sub-category counts as
    /// a high-growth or steep-decline item in category detail views.
    #[serde(default = "default_swing_threshold")]
    pub swing_threshold: Decimal,

    /// Label of the factory extract's pre-aggregated total row, which must
    /// be excluded from per-unit analyses.
    #[serde(default = "default_total_row_label")]
    pub total_row_label: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            factory: default_factory_file(),
            supplier: default_supplier_file(),
            category: default_category_file(),
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            high_dependency_threshold: default_high_dependency_threshold(),
            min_growth_base: default_min_growth_base(),
            concentration_top_k: default_concentration_top_k(),
            ranking_size: default_ranking_size(),
            decline_rate_threshold: default_decline_rate_threshold(),
            decline_base_threshold: default_decline_base_threshold(),
            swing_threshold: default_swing_threshold(),
            total_row_label: default_total_row_label(),
        }
    }
}

fn default_factory_file() -> PathBuf {
    PathBuf::from("data/factory.csv")
}

fn default_supplier_file() -> PathBuf {
    PathBuf::from("data/supplier.csv")
}

fn default_category_file() -> PathBuf {
    PathBuf::from("data/category.csv")
}

fn default_high_dependency_threshold() -> Decimal {
    dec!(0.10)
}

fn default_min_growth_base() -> Decimal {
    dec!(100_000)
}

fn default_concentration_top_k() -> usize {
    5
}

fn default_ranking_size() -> usize {
    10
}

fn default_decline_rate_threshold() -> Decimal {
    dec!(-30)
}

fn default_decline_base_threshold() -> Decimal {
    dec!(1_000_000)
}

fn default_swing_threshold() -> Decimal {
    dec!(30)
}

fn default_total_row_label() -> String {
    "Total".to_string()
}
