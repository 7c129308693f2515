//! Command-line entry point for the sales feature pipeline

use chrono::NaiveDate;
use clap::Parser;
use forecast_features::pipeline::{run, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "forecast_features",
    version,
    about = "Derive rolling sales features and report the worst WMAPE groups"
)]
struct Args {
    /// First day of the reporting window (inclusive)
    #[arg(long, default_value = "2021-01-08")]
    min_date: NaiveDate,

    /// Last day of the reporting window (inclusive)
    #[arg(long, default_value = "2021-05-30")]
    max_date: NaiveDate,

    /// Number of worst-scoring groups to report
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Sales fact table
    #[arg(long, default_value = "data/sales.csv")]
    sales: PathBuf,

    /// Product dimension table
    #[arg(long, default_value = "data/product.csv")]
    product: PathBuf,

    /// Brand dimension table
    #[arg(long, default_value = "data/brand.csv")]
    brand: PathBuf,

    /// Store dimension table
    #[arg(long, default_value = "data/store.csv")]
    store: PathBuf,

    /// Output path for the feature table
    #[arg(long, default_value = "features.csv")]
    features_out: PathBuf,

    /// Output path for the scored-group table
    #[arg(long, default_value = "mapes.csv")]
    wmape_out: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let config = PipelineConfig {
        sales_path: args.sales,
        product_path: args.product,
        brand_path: args.brand,
        store_path: args.store,
        min_date: args.min_date,
        max_date: args.max_date,
        top_n: args.top,
        features_path: args.features_out,
        wmape_path: args.wmape_out,
    };

    match run(&config) {
        Ok(_) => {
            println!("First output written to: {}", config.features_path.display());
            println!("Second output written to: {}", config.wmape_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Pipeline failed: {err}");
            ExitCode::FAILURE
        }
    }
}
