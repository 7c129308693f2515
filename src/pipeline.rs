//! One-shot batch pipeline: merge, date filter, feature derivation,
//! scoring, and output
//!
//! Every stage consumes an immutable table and produces a new one; no
//! stage mutates state another stage can see. Loading errors abort the
//! run before anything is written.

use crate::data::{self, BrandDim, ProductDim, SalesFact, StoreDim};
use crate::error::{FeatureError, Result};
use crate::features::{compute_features, FeatureRecord};
use crate::merge::{merge_tables, SalesRecord};
use crate::metrics::{score_features, WmapeRecord};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::path::PathBuf;

/// File locations and run parameters for one pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sales_path: PathBuf,
    pub product_path: PathBuf,
    pub brand_path: PathBuf,
    pub store_path: PathBuf,
    /// First day of the reporting window, inclusive
    pub min_date: NaiveDate,
    /// Last day of the reporting window, inclusive
    pub max_date: NaiveDate,
    /// Number of worst-scoring groups to report
    pub top_n: usize,
    pub features_path: PathBuf,
    pub wmape_path: PathBuf,
}

/// Row counts from a completed pipeline run
#[derive(Debug, Clone, Copy)]
pub struct PipelineRun {
    pub feature_rows: usize,
    pub scored_groups: usize,
}

/// Keep records whose date lies inside the inclusive [min, max] range
pub fn filter_date_range(
    records: Vec<SalesRecord>,
    min_date: NaiveDate,
    max_date: NaiveDate,
) -> Vec<SalesRecord> {
    records
        .into_iter()
        .filter(|record| record.date >= min_date && record.date <= max_date)
        .collect()
}

/// Stable ascending sort of the feature table by
/// (product, brand, store, date)
pub fn sort_features(features: &mut [FeatureRecord]) {
    features.sort_by(|a, b| {
        (&a.product_id, &a.brand_id, &a.store_id, a.date)
            .cmp(&(&b.product_id, &b.brand_id, &b.store_id, b.date))
    });
}

/// Stable descending sort by WMAPE, truncated to the worst `top_n`
/// groups. Equal scores keep their incoming order.
pub fn worst_groups(mut scores: Vec<WmapeRecord>, top_n: usize) -> Vec<WmapeRecord> {
    // Scores are finite by construction; degenerate groups were
    // excluded upstream
    scores.sort_by(|a, b| b.wmape.partial_cmp(&a.wmape).unwrap_or(Ordering::Equal));
    scores.truncate(top_n);
    scores
}

/// Run the in-memory pipeline over already-loaded tables.
///
/// Returns the feature table sorted for output and the worst `top_n`
/// scored groups.
pub fn process(
    facts: &[SalesFact],
    products: &[ProductDim],
    brands: &[BrandDim],
    stores: &[StoreDim],
    min_date: NaiveDate,
    max_date: NaiveDate,
    top_n: usize,
) -> (Vec<FeatureRecord>, Vec<WmapeRecord>) {
    let merged = merge_tables(facts, products, brands, stores);
    log::info!("Merged {} of {} sales facts", merged.len(), facts.len());

    let filtered = filter_date_range(merged, min_date, max_date);
    log::info!(
        "{} rows within [{}, {}]",
        filtered.len(),
        min_date,
        max_date
    );

    let mut features = compute_features(&filtered);
    sort_features(&mut features);

    let scores = worst_groups(score_features(&features), top_n);

    (features, scores)
}

/// Load the four input tables, run the pipeline, and write both output
/// tables.
pub fn run(config: &PipelineConfig) -> Result<PipelineRun> {
    if config.min_date > config.max_date {
        return Err(FeatureError::ValidationError(format!(
            "Min date {} is after max date {}",
            config.min_date, config.max_date
        )));
    }
    if config.top_n == 0 {
        return Err(FeatureError::ValidationError(
            "Result count must be positive".to_string(),
        ));
    }

    let facts = data::load_sales(&config.sales_path)?;
    let products = data::load_products(&config.product_path)?;
    let brands = data::load_brands(&config.brand_path)?;
    let stores = data::load_stores(&config.store_path)?;
    log::info!(
        "Loaded {} sales facts, {} products, {} brands, {} stores",
        facts.len(),
        products.len(),
        brands.len(),
        stores.len()
    );

    let (features, scores) = process(
        &facts,
        &products,
        &brands,
        &stores,
        config.min_date,
        config.max_date,
        config.top_n,
    );

    data::write_features(&config.features_path, &features)?;
    log::info!(
        "Wrote {} feature rows to {}",
        features.len(),
        config.features_path.display()
    );

    data::write_wmape(&config.wmape_path, &scores)?;
    log::info!(
        "Wrote {} scored groups to {}",
        scores.len(),
        config.wmape_path.display()
    );

    Ok(PipelineRun {
        feature_rows: features.len(),
        scored_groups: scores.len(),
    })
}
