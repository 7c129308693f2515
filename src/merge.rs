//! Relational merge of the sales facts with the three dimension tables

use crate::data::{BrandDim, ProductDim, SalesFact, StoreDim};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A sales fact joined with its product, brand, and store dimensions.
///
/// Name fields carry their source-table role so the `name` columns of
/// the three dimensions stay distinguishable after denormalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub product_id: String,
    pub store_id: String,
    pub brand_id: String,
    pub quantity: f64,
    pub product_name: String,
    pub brand_name: String,
    pub store_name: String,
}

/// Join each sales fact with its product, brand, and store rows.
///
/// Inner-join semantics on all three relationships: the fact's product
/// id against the product dimension, the product's brand name against
/// the brand dimension, and the fact's store id against the store
/// dimension. A fact with no match on any of the three keys produces
/// no output row; that exclusion is silent and expected. The join
/// never multiplies rows, so the output count is at most the fact
/// count. Output row order is unspecified; callers re-sort downstream.
pub fn merge_tables(
    facts: &[SalesFact],
    products: &[ProductDim],
    brands: &[BrandDim],
    stores: &[StoreDim],
) -> Vec<SalesRecord> {
    // First occurrence wins on duplicate dimension keys
    let mut product_index: HashMap<&str, &ProductDim> = HashMap::new();
    for product in products {
        product_index.entry(product.id.as_str()).or_insert(product);
    }

    let mut brand_index: HashMap<&str, &BrandDim> = HashMap::new();
    for brand in brands {
        brand_index.entry(brand.name.as_str()).or_insert(brand);
    }

    let mut store_index: HashMap<&str, &StoreDim> = HashMap::new();
    for store in stores {
        store_index.entry(store.id.as_str()).or_insert(store);
    }

    facts
        .iter()
        .filter_map(|fact| {
            let product = product_index.get(fact.product.as_str())?;
            let brand = brand_index.get(product.brand.as_str())?;
            let store = store_index.get(fact.store.as_str())?;

            Some(SalesRecord {
                date: fact.date,
                product_id: fact.product.clone(),
                store_id: fact.store.clone(),
                brand_id: brand.id.clone(),
                quantity: fact.quantity,
                product_name: product.name.clone(),
                brand_name: brand.name.clone(),
                store_name: store.name.clone(),
            })
        })
        .collect()
}
