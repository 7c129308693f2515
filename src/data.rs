//! Input tables and CSV I/O for the sales pipeline
//!
//! The four input tables are loaded eagerly into typed records; a
//! missing column or an unparseable date or quantity aborts the load
//! before any downstream stage runs. The two output tables always
//! carry a header row, even when empty.

use crate::error::{FeatureError, Result};
use crate::features::{FeatureRecord, FEATURE_COLUMNS};
use crate::metrics::{WmapeRecord, WMAPE_COLUMNS};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

/// One row of the sales fact table: quantity sold for a product at a
/// store on a calendar day
#[derive(Debug, Clone, Deserialize)]
pub struct SalesFact {
    /// Day of sale
    pub date: NaiveDate,
    /// Product identifier, joined against the product dimension
    pub product: String,
    /// Store identifier, joined against the store dimension
    pub store: String,
    /// Quantity sold
    pub quantity: f64,
}

/// Product dimension row; `brand` references the brand dimension by name
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDim {
    pub id: String,
    pub name: String,
    pub brand: String,
}

/// Brand dimension row, referenced by name from the product dimension
#[derive(Debug, Clone, Deserialize)]
pub struct BrandDim {
    pub id: String,
    pub name: String,
}

/// Store dimension row
#[derive(Debug, Clone, Deserialize)]
pub struct StoreDim {
    pub id: String,
    pub name: String,
}

/// Load the sales fact table from a CSV file
pub fn load_sales<P: AsRef<Path>>(path: P) -> Result<Vec<SalesFact>> {
    load_table(path, "sales")
}

/// Load the product dimension from a CSV file
pub fn load_products<P: AsRef<Path>>(path: P) -> Result<Vec<ProductDim>> {
    load_table(path, "product")
}

/// Load the brand dimension from a CSV file
pub fn load_brands<P: AsRef<Path>>(path: P) -> Result<Vec<BrandDim>> {
    load_table(path, "brand")
}

/// Load the store dimension from a CSV file
pub fn load_stores<P: AsRef<Path>>(path: P) -> Result<Vec<StoreDim>> {
    load_table(path, "store")
}

/// Read a whole CSV table into typed rows, headers required.
///
/// Errors carry the table name and the 1-based line of the offending
/// row so a bad input file can be fixed without guesswork.
fn load_table<T, P>(path: P, table: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let mut reader = csv::Reader::from_path(&path).map_err(|e| {
        FeatureError::DataError(format!(
            "Failed to open {} table at {}: {}",
            table,
            path.as_ref().display(),
            e
        ))
    })?;

    let mut rows = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        let row: T = row.map_err(|e| {
            FeatureError::DataError(format!("Invalid {} row at line {}: {}", table, i + 2, e))
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Write the feature table to a CSV file, header first
pub fn write_features<P: AsRef<Path>>(path: P, rows: &[FeatureRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(FEATURE_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the scored-group table to a CSV file, header first
pub fn write_wmape<P: AsRef<Path>>(path: P, rows: &[WmapeRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(WMAPE_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
