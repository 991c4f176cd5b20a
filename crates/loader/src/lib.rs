//! CSV ingestion for the three procurement extracts.
//!
//! The loader is the engine's external collaborator: it owns file access,
//! encoding quirks and numeric coercion, and hands the engine a fresh,
//! read-only snapshot of records. Numeric fields may arrive as text with
//! thousands separators and a trailing percent sign; coercion failures
//! become missing-value markers (`None`), never errors, so one malformed
//! cell cannot sink a whole extract.

use chrono::{DateTime, Utc};
use core_types::{CategoryRecord, FactoryRecord, SupplierRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub mod coerce;
pub mod error;

pub use error::LoaderError;

use coerce::lenient_decimal;

/// An immutable snapshot of all three extracts, stamped at load time.
///
/// The timestamp exists for display ("data as of ..."); any staleness or
/// refresh policy is the caller's concern.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub factories: Vec<FactoryRecord>,
    pub suppliers: Vec<SupplierRecord>,
    pub categories: Vec<CategoryRecord>,
    pub loaded_at: DateTime<Utc>,
}

/// Loads all three extracts from their configured paths.
pub fn load_dataset(
    factory_path: &Path,
    supplier_path: &Path,
    category_path: &Path,
) -> Result<DataSet, LoaderError> {
    let factories = load_factories_file(factory_path)?;
    let suppliers = load_suppliers_file(supplier_path)?;
    let categories = load_categories_file(category_path)?;
    info!(
        factories = factories.len(),
        suppliers = suppliers.len(),
        categories = categories.len(),
        "loaded procurement snapshot"
    );
    Ok(DataSet {
        factories,
        suppliers,
        categories,
        loaded_at: Utc::now(),
    })
}

/// One raw row of the factory extract, before conversion to the core type.
#[derive(Debug, Deserialize)]
struct FactoryRow {
    business_unit: String,
    #[serde(deserialize_with = "lenient_decimal")]
    amount_2024: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    forecast_2025: Option<Decimal>,
}

impl FactoryRow {
    fn into_record(self) -> FactoryRecord {
        FactoryRecord {
            business_unit: self.business_unit,
            amount_2024: self.amount_2024,
            forecast_2025: self.forecast_2025,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SupplierRow {
    supplier_name: String,
    category: String,
    sub_category: String,
    #[serde(deserialize_with = "lenient_decimal")]
    amount_2024: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    budget_2025: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    huifeng_2024: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    tongmeng_2024: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    suzhou_2024: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    huifeng_2025: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    tongmeng_2025: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    suzhou_2025: Option<Decimal>,
}

impl SupplierRow {
    fn into_record(self) -> SupplierRecord {
        SupplierRecord {
            supplier_name: self.supplier_name,
            category: self.category,
            sub_category: self.sub_category,
            amount_2024: self.amount_2024,
            budget_2025: self.budget_2025,
            huifeng_2024: self.huifeng_2024,
            tongmeng_2024: self.tongmeng_2024,
            suzhou_2024: self.suzhou_2024,
            huifeng_2025: self.huifeng_2025,
            tongmeng_2025: self.tongmeng_2025,
            suzhou_2025: self.suzhou_2025,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    category: String,
    sub_category: String,
    #[serde(deserialize_with = "lenient_decimal")]
    spend_2024: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    spend_2025: Option<Decimal>,
}

impl CategoryRow {
    fn into_record(self) -> CategoryRecord {
        CategoryRecord {
            category: self.category,
            sub_category: self.sub_category,
            spend_2024: self.spend_2024,
            spend_2025: self.spend_2025,
        }
    }
}

/// Reads factory rows from any reader (a file in production, a string in
/// tests).
pub fn load_factories<R: Read>(reader: R) -> Result<Vec<FactoryRecord>, csv::Error> {
    let mut csv_reader = reader_builder().from_reader(reader);
    csv_reader
        .deserialize()
        .map(|result| result.map(FactoryRow::into_record))
        .collect()
}

pub fn load_suppliers<R: Read>(reader: R) -> Result<Vec<SupplierRecord>, csv::Error> {
    let mut csv_reader = reader_builder().from_reader(reader);
    csv_reader
        .deserialize()
        .map(|result| result.map(SupplierRow::into_record))
        .collect()
}

pub fn load_categories<R: Read>(reader: R) -> Result<Vec<CategoryRecord>, csv::Error> {
    let mut csv_reader = reader_builder().from_reader(reader);
    csv_reader
        .deserialize()
        .map(|result| result.map(CategoryRow::into_record))
        .collect()
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::All);
    builder
}

fn load_factories_file(path: &Path) -> Result<Vec<FactoryRecord>, LoaderError> {
    let file = open(path)?;
    load_factories(file).map_err(|source| LoaderError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn load_suppliers_file(path: &Path) -> Result<Vec<SupplierRecord>, LoaderError> {
    let file = open(path)?;
    load_suppliers(file).map_err(|source| LoaderError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn load_categories_file(path: &Path) -> Result<Vec<CategoryRecord>, LoaderError> {
    let file = open(path)?;
    load_categories(file).map_err(|source| LoaderError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn open(path: &Path) -> Result<File, LoaderError> {
    File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
