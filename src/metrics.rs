//! Forecast-accuracy scoring for the derived features
//!
//! The scored question: how well does the trailing product-level
//! rolling mean predict realized sales? Scoring is per (product,
//! store, brand) group using WMAPE, the sum of absolute errors over
//! the sum of actuals.

use crate::error::{FeatureError, Result};
use crate::features::FeatureRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Output column order for the scored-group table
pub const WMAPE_COLUMNS: [&str; 4] = ["product_id", "store_id", "brand_id", "WMAPE"];

/// Weighted mean absolute percentage error for one scored group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WmapeRecord {
    pub product_id: String,
    pub store_id: String,
    pub brand_id: String,
    #[serde(rename = "WMAPE")]
    pub wmape: f64,
}

/// Weighted mean absolute percentage error: the sum of absolute errors
/// divided by the sum of actuals.
///
/// Weighting by actuals means a miss on a high-volume day costs more
/// than the same relative miss on a slow day. Errors when the slices
/// are empty or of different lengths, and when the actuals sum to zero
/// (the metric is undefined there; callers decide whether to skip the
/// group or abort).
pub fn wmape(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    if actual.len() != forecast.len() || actual.is_empty() {
        return Err(FeatureError::ValidationError(
            "Actual and forecast values must have the same non-zero length".to_string(),
        ));
    }

    let abs_error: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(&a, &f)| (a - f).abs())
        .sum();
    let total: f64 = actual.iter().sum();

    if total == 0.0 {
        return Err(FeatureError::ZeroDenominator(
            "Sum of actual values is zero".to_string(),
        ));
    }

    Ok(abs_error / total)
}

/// Score the trailing-mean forecast per (product, store, brand) group.
///
/// Rows with any absent feature value are dropped first; that removes
/// at least the first seven rows of every (product, store) group plus
/// rows whose brand or store series lacks history. A group whose
/// surviving sales sum to zero is excluded from the result and
/// reported through the log rather than emitting an undefined value.
///
/// Groups are emitted in ascending (product, store, brand) key order,
/// so the orchestrator's later stable sort keeps a deterministic order
/// for equal scores.
pub fn score_features(features: &[FeatureRecord]) -> Vec<WmapeRecord> {
    let mut groups: BTreeMap<(&str, &str, &str), (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for row in features.iter().filter(|row| has_complete_features(row)) {
        let (actual, forecast) = groups
            .entry((
                row.product_id.as_str(),
                row.store_id.as_str(),
                row.brand_id.as_str(),
            ))
            .or_default();
        actual.push(row.sales_product);
        forecast.push(row.ma7_product);
    }

    let mut scores = Vec::with_capacity(groups.len());
    for ((product_id, store_id, brand_id), (actual, forecast)) in groups {
        match wmape(&actual, &forecast) {
            Ok(value) => scores.push(WmapeRecord {
                product_id: product_id.to_string(),
                store_id: store_id.to_string(),
                brand_id: brand_id.to_string(),
                wmape: value,
            }),
            Err(err) => {
                log::warn!(
                    "Skipping group ({}, {}, {}): {}",
                    product_id,
                    store_id,
                    brand_id,
                    err
                );
            }
        }
    }

    scores
}

/// A row is scoreable only when every derived feature is present; the
/// lag features are the ones that can be absent.
fn has_complete_features(row: &FeatureRecord) -> bool {
    row.lag7_product.is_some() && row.lag7_brand.is_some() && row.lag7_store.is_some()
}
