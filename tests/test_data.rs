use chrono::NaiveDate;
use forecast_features::data::{
    load_brands, load_products, load_sales, load_stores, write_features, write_wmape,
};
use forecast_features::error::FeatureError;
use forecast_features::features::FeatureRecord;
use forecast_features::metrics::WmapeRecord;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn loads_sales_facts_with_parsed_dates() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,product,store,quantity").unwrap();
    writeln!(file, "2021-01-08,P1,S1,3").unwrap();
    writeln!(file, "2021-01-09,P1,S1,4.5").unwrap();

    let facts = load_sales(file.path()).unwrap();

    assert_eq!(facts.len(), 2);
    assert_eq!(facts[0].date, NaiveDate::from_ymd_opt(2021, 1, 8).unwrap());
    assert_eq!(facts[0].product, "P1");
    assert_eq!(facts[1].quantity, 4.5);
}

#[test]
fn loads_the_three_dimension_tables() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,name,brand").unwrap();
    writeln!(file, "P1,Widget,Acme").unwrap();
    let products = load_products(file.path()).unwrap();
    assert_eq!(products[0].brand, "Acme");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,name").unwrap();
    writeln!(file, "B1,Acme").unwrap();
    let brands = load_brands(file.path()).unwrap();
    assert_eq!(brands[0].id, "B1");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,name").unwrap();
    writeln!(file, "S1,Downtown").unwrap();
    let stores = load_stores(file.path()).unwrap();
    assert_eq!(stores[0].name, "Downtown");
}

#[test]
fn unparseable_date_is_a_fatal_data_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,product,store,quantity").unwrap();
    writeln!(file, "not-a-date,P1,S1,3").unwrap();

    let result = load_sales(file.path());

    assert!(matches!(result, Err(FeatureError::DataError(_))));
}

#[test]
fn unparseable_quantity_is_a_fatal_data_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,product,store,quantity").unwrap();
    writeln!(file, "2021-01-08,P1,S1,lots").unwrap();

    let result = load_sales(file.path());

    assert!(matches!(result, Err(FeatureError::DataError(_))));
}

#[test]
fn missing_column_is_a_fatal_data_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,product,store").unwrap();
    writeln!(file, "2021-01-08,P1,S1").unwrap();

    let result = load_sales(file.path());

    assert!(matches!(result, Err(FeatureError::DataError(_))));
}

#[test]
fn missing_file_is_a_fatal_data_error() {
    let result = load_sales("no_such_file.csv");
    assert!(matches!(result, Err(FeatureError::DataError(_))));
}

#[test]
fn empty_feature_table_still_gets_a_header() {
    let file = NamedTempFile::new().unwrap();

    write_features(file.path(), &[]).unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(
        content,
        "product_id,store_id,brand_id,date,sales_product,MA7_P,LAG7_P,\
         sales_brand,MA7_B,LAG7_B,sales_store,MA7_S,LAG7_S\n"
    );
}

#[test]
fn empty_wmape_table_still_gets_a_header() {
    let file = NamedTempFile::new().unwrap();

    write_wmape(file.path(), &[]).unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(content, "product_id,store_id,brand_id,WMAPE\n");
}

#[test]
fn absent_lag_features_serialize_as_empty_fields() {
    let row = FeatureRecord {
        product_id: "P1".to_string(),
        store_id: "S1".to_string(),
        brand_id: "B1".to_string(),
        date: NaiveDate::from_ymd_opt(2021, 1, 8).unwrap(),
        sales_product: 3.0,
        ma7_product: 2.0,
        lag7_product: None,
        sales_brand: 8.0,
        ma7_brand: 6.0,
        lag7_brand: None,
        sales_store: 8.0,
        ma7_store: 6.0,
        lag7_store: Some(4.0),
    };

    let file = NamedTempFile::new().unwrap();
    write_features(file.path(), &[row]).unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    let line = content.lines().nth(1).unwrap();
    let fields: Vec<&str> = line.split(',').collect();

    assert_eq!(fields.len(), 13);
    assert_eq!(fields[3], "2021-01-08");
    assert_eq!(fields[6], ""); // LAG7_P
    assert_eq!(fields[9], ""); // LAG7_B
    assert_eq!(fields[12], "4.0"); // LAG7_S
}

#[test]
fn wmape_rows_serialize_in_column_order() {
    let row = WmapeRecord {
        product_id: "P1".to_string(),
        store_id: "S1".to_string(),
        brand_id: "B1".to_string(),
        wmape: 0.25,
    };

    let file = NamedTempFile::new().unwrap();
    write_wmape(file.path(), &[row]).unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(content.lines().nth(1).unwrap(), "P1,S1,B1,0.25");
}
