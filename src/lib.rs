//! # Forecast Features
//!
//! A Rust library for retail sales feature engineering and forecast
//! accuracy reporting.
//!
//! ## Features
//!
//! - Relational merge of a sales fact table with product, brand, and
//!   store dimensions (inner join, unmatched facts dropped)
//! - Rolling-mean and lag features at three nested granularities:
//!   product-store, brand-store, and store
//! - Per-group WMAPE scoring of the trailing-mean forecast with
//!   worst-first reporting
//! - CSV in, CSV out; the whole run is a single in-memory batch
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use forecast_features::pipeline::{run, PipelineConfig};
//!
//! # fn main() -> forecast_features::Result<()> {
//! let config = PipelineConfig {
//!     sales_path: "data/sales.csv".into(),
//!     product_path: "data/product.csv".into(),
//!     brand_path: "data/brand.csv".into(),
//!     store_path: "data/store.csv".into(),
//!     min_date: NaiveDate::from_ymd_opt(2021, 1, 8).unwrap(),
//!     max_date: NaiveDate::from_ymd_opt(2021, 5, 30).unwrap(),
//!     top_n: 5,
//!     features_path: "features.csv".into(),
//!     wmape_path: "mapes.csv".into(),
//! };
//!
//! let summary = run(&config)?;
//! println!(
//!     "{} feature rows, {} scored groups",
//!     summary.feature_rows, summary.scored_groups
//! );
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod features;
pub mod merge;
pub mod metrics;
pub mod pipeline;

// Re-export commonly used types
pub use crate::error::{FeatureError, Result};
pub use crate::features::{compute_features, FeatureRecord};
pub use crate::merge::{merge_tables, SalesRecord};
pub use crate::metrics::{score_features, wmape, WmapeRecord};
pub use crate::pipeline::{run, PipelineConfig, PipelineRun};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
