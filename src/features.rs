//! Hierarchical rolling-window and lag features over merged sales records
//!
//! Features are derived at three nested granularities: per product and
//! store, per brand and store, and per store. Each granularity gets a
//! trailing rolling mean and a positional lag of its sales series. The
//! brand and store series are daily totals, one observation per
//! distinct date within the group; the rolling and lag treatment there
//! runs over those totals, not over the underlying product rows.
//!
//! Every windowed computation requires its group to be in ascending
//! date order first. That ordering is established explicitly by
//! [`sort_chronologically`] inside each pass; a window or lag never
//! reaches across a group boundary.

use crate::merge::SalesRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

/// Observations per trailing rolling window
pub const ROLLING_WINDOW: usize = 7;

/// Rows (or daily observations) a lagged value reaches back
pub const LAG_OFFSET: usize = 7;

/// Output column order for the feature table
pub const FEATURE_COLUMNS: [&str; 13] = [
    "product_id",
    "store_id",
    "brand_id",
    "date",
    "sales_product",
    "MA7_P",
    "LAG7_P",
    "sales_brand",
    "MA7_B",
    "LAG7_B",
    "sales_store",
    "MA7_S",
    "LAG7_S",
];

/// One derived feature row per (product, store, brand, date).
///
/// The rolling means are always present (minimum window of one); the
/// lag fields are absent until their group has enough history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub product_id: String,
    pub store_id: String,
    pub brand_id: String,
    pub date: NaiveDate,
    /// Quantity sold for this product at this store on this date
    pub sales_product: f64,
    /// Trailing rolling mean of `sales_product` within (product, store)
    #[serde(rename = "MA7_P")]
    pub ma7_product: f64,
    /// `sales_product` from seven rows earlier within (product, store)
    #[serde(rename = "LAG7_P")]
    pub lag7_product: Option<f64>,
    /// Total sales of the brand at this store on this date
    pub sales_brand: f64,
    /// Trailing rolling mean of the brand's daily totals at this store
    #[serde(rename = "MA7_B")]
    pub ma7_brand: f64,
    /// Brand daily total from seven observed dates earlier
    #[serde(rename = "LAG7_B")]
    pub lag7_brand: Option<f64>,
    /// Total sales of the store on this date
    pub sales_store: f64,
    /// Trailing rolling mean of the store's daily totals
    #[serde(rename = "MA7_S")]
    pub ma7_store: f64,
    /// Store daily total from seven observed dates earlier
    #[serde(rename = "LAG7_S")]
    pub lag7_store: Option<f64>,
}

/// Trailing rolling mean with a minimum period of one.
///
/// The window ends at and includes the current position; positions
/// with fewer than `window` prior observations average what exists, so
/// every position of a non-empty input gets a value.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    debug_assert!(window > 0, "rolling window must be non-zero");

    let mut out = Vec::with_capacity(values.len());
    let mut buffer: VecDeque<f64> = VecDeque::with_capacity(window);
    let mut sum = 0.0;

    for &value in values {
        buffer.push_back(value);
        sum += value;

        if buffer.len() > window {
            if let Some(oldest) = buffer.pop_front() {
                sum -= oldest;
            }
        }

        out.push(sum / buffer.len() as f64);
    }

    out
}

/// Positional lag: the value `offset` positions earlier in the sequence.
///
/// The first `offset` positions have no lagged value. The shift counts
/// positions, not calendar days; gaps in the underlying dates are not
/// filled in.
pub fn lag(values: &[f64], offset: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| if i >= offset { Some(values[i - offset]) } else { None })
        .collect()
}

/// Sort items into ascending date order, keeping the incoming order of
/// equal dates.
///
/// Windowed computations are only correct on chronologically ordered
/// groups; every feature pass runs this on its group before taking a
/// rolling mean or lag.
pub fn sort_chronologically<T, F>(items: &mut [T], date_of: F)
where
    F: Fn(&T) -> NaiveDate,
{
    items.sort_by_key(|item| date_of(item));
}

/// Derive the full feature set from merged sales records.
///
/// Three independent passes over the immutable input, one per
/// granularity; the results are joined back onto the rows positionally
/// (product level) or by group key and date (brand and store levels).
/// Output rows are parallel to `records`; their order is unspecified
/// and fixed later by the orchestrator.
pub fn compute_features(records: &[SalesRecord]) -> Vec<FeatureRecord> {
    let (ma7_product, lag7_product) = product_windows(records);
    let brand_daily = daily_windows(records, |r| (r.brand_id.clone(), r.store_id.clone()));
    let store_daily = daily_windows(records, |r| r.store_id.clone());

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let (sales_brand, ma7_brand, lag7_brand) =
                brand_daily[&((record.brand_id.clone(), record.store_id.clone()), record.date)];
            let (sales_store, ma7_store, lag7_store) =
                store_daily[&(record.store_id.clone(), record.date)];

            FeatureRecord {
                product_id: record.product_id.clone(),
                store_id: record.store_id.clone(),
                brand_id: record.brand_id.clone(),
                date: record.date,
                sales_product: record.quantity,
                ma7_product: ma7_product[i],
                lag7_product: lag7_product[i],
                sales_brand,
                ma7_brand,
                lag7_brand,
                sales_store,
                ma7_store,
                lag7_store,
            }
        })
        .collect()
}

/// Rolling mean and lag of the raw quantity within each (product, store)
/// group, returned as per-input-row parallel vectors.
fn product_windows(records: &[SalesRecord]) -> (Vec<f64>, Vec<Option<f64>>) {
    let mut groups: BTreeMap<(&str, &str), Vec<usize>> = BTreeMap::new();
    for (i, record) in records.iter().enumerate() {
        groups
            .entry((record.product_id.as_str(), record.store_id.as_str()))
            .or_default()
            .push(i);
    }

    let mut means = vec![0.0; records.len()];
    let mut lags = vec![None; records.len()];

    for indices in groups.values_mut() {
        sort_chronologically(indices, |&i| records[i].date);

        let series: Vec<f64> = indices.iter().map(|&i| records[i].quantity).collect();
        let windowed = rolling_mean(&series, ROLLING_WINDOW);
        let shifted = lag(&series, LAG_OFFSET);

        for (pos, &i) in indices.iter().enumerate() {
            means[i] = windowed[pos];
            lags[i] = shifted[pos];
        }
    }

    (means, lags)
}

/// Aggregate quantity into per-date totals for each group, then apply
/// the rolling mean and lag over each group's chronologically ordered
/// daily series.
///
/// Returns `(total, rolling mean, lag)` keyed by group and date, ready
/// to join back onto every row of that group and date.
fn daily_windows<K, F>(
    records: &[SalesRecord],
    key_of: F,
) -> HashMap<(K, NaiveDate), (f64, f64, Option<f64>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&SalesRecord) -> K,
{
    let mut totals: HashMap<K, HashMap<NaiveDate, f64>> = HashMap::new();
    for record in records {
        *totals
            .entry(key_of(record))
            .or_default()
            .entry(record.date)
            .or_insert(0.0) += record.quantity;
    }

    let mut out = HashMap::new();
    for (key, by_date) in totals {
        let mut days: Vec<(NaiveDate, f64)> = by_date.into_iter().collect();
        sort_chronologically(&mut days, |day| day.0);

        let series: Vec<f64> = days.iter().map(|&(_, total)| total).collect();
        let windowed = rolling_mean(&series, ROLLING_WINDOW);
        let shifted = lag(&series, LAG_OFFSET);

        for (pos, &(date, total)) in days.iter().enumerate() {
            out.insert((key.clone(), date), (total, windowed[pos], shifted[pos]));
        }
    }

    out
}
