//! Integration test: training pipeline (load → coerce → fit → predict)

use laptop_pricer::dataset;
use laptop_pricer::schema::{FeatureRecord, FeatureValue, FEATURE_COLUMNS};
use laptop_pricer::training::{self, TrainingConfig};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str =
    "Company,TypeName,Inches,CPU_Company,CPU_Frequency,RAM,Memory,Weight,OpSys,Price,Product";

fn dataset_csv(n: usize) -> NamedTempFile {
    let companies = ["Apple", "Dell", "HP", "Lenovo"];
    let types = ["Ultrabook", "Notebook", "Gaming"];

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..n {
        let company = companies[i % companies.len()];
        let type_name = types[i % types.len()];
        let ram = 4 + (i % 8) * 4;
        let inches = 12.0 + (i % 6) as f64;
        let price = 200.0 + ram as f64 * 70.0 + inches * 8.0;
        writeln!(
            file,
            "{company},{type_name},{inches},Intel,2.5,{ram},256GB SSD,1.9,Windows 10,{price:.2},Model {i}"
        )
        .unwrap();
    }
    file
}

fn record_for(company: &str, ram: f64, inches: f64) -> FeatureRecord {
    let values = FEATURE_COLUMNS
        .iter()
        .map(|col| match *col {
            "Company" => FeatureValue::categorical(company),
            "TypeName" => FeatureValue::categorical("Notebook"),
            "Inches" => FeatureValue::numeric(inches),
            "CPU_Company" => FeatureValue::categorical("Intel"),
            "CPU_Frequency" => FeatureValue::numeric(2.5),
            "RAM" => FeatureValue::numeric(ram),
            "Memory" => FeatureValue::categorical("256GB SSD"),
            "Weight" => FeatureValue::numeric(1.9),
            "OpSys" => FeatureValue::categorical("Windows 10"),
            other => unreachable!("{other}"),
        })
        .collect();
    FeatureRecord::new(values).unwrap()
}

#[test]
fn test_fit_from_csv_produces_metrics() {
    let file = dataset_csv(60);
    let set = dataset::load_training_set(file.path()).unwrap();
    let config = TrainingConfig::default().with_n_estimators(30);

    let pipeline = training::fit(&set, &config).unwrap();
    let metrics = pipeline.metrics();

    assert!(metrics.rmse.is_finite() && metrics.rmse >= 0.0);
    assert!(metrics.mae.is_finite() && metrics.mae >= 0.0);
    assert_eq!(metrics.n_train + metrics.n_test, 60);
}

#[test]
fn test_predict_never_errors_on_schema_complete_rows() {
    let file = dataset_csv(40);
    let set = dataset::load_training_set(file.path()).unwrap();
    let pipeline =
        training::fit(&set, &TrainingConfig::default().with_n_estimators(20)).unwrap();

    // Seen and unseen companies, extreme numerics, all must predict
    for (company, ram, inches) in [
        ("Apple", 8.0, 13.3),
        ("Razer", 64.0, 18.4),
        ("Chuwi", 0.0, 0.0),
        ("", 8.0, 15.6),
    ] {
        let price = pipeline.predict(&record_for(company, ram, inches)).unwrap();
        assert!(price.is_finite(), "{company}: price not finite");
    }
}

#[test]
fn test_missing_declared_column_is_rejected() {
    let pairs: Vec<(String, FeatureValue)> = FEATURE_COLUMNS
        .iter()
        .filter(|c| **c != "RAM")
        .map(|col| {
            let value = if laptop_pricer::schema::is_numeric(col) {
                FeatureValue::numeric(1.0)
            } else {
                FeatureValue::categorical("x")
            };
            (col.to_string(), value)
        })
        .collect();

    let err = FeatureRecord::from_pairs(pairs).unwrap_err();
    assert!(err.to_string().contains("RAM"));
}

#[test]
fn test_same_seed_reproduces_fit() {
    let file = dataset_csv(50);
    let set = dataset::load_training_set(file.path()).unwrap();
    let config = TrainingConfig::default().with_n_estimators(15).with_seed(7);

    let a = training::fit(&set, &config).unwrap();
    let b = training::fit(&set, &config).unwrap();

    let probe = record_for("Dell", 16.0, 15.0);
    assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    assert_eq!(a.metrics(), b.metrics());
}

#[test]
fn test_coerced_numeric_garbage_still_trains() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..20 {
        // Every fourth row has garbage in Inches; it must impute, not fail
        let inches = if i % 4 == 0 { "?".to_string() } else { "15.6".to_string() };
        writeln!(
            file,
            "Dell,Notebook,{inches},Intel,2.5,8,256GB SSD,1.9,Windows 10,{},XPS",
            600.0 + i as f64 * 10.0
        )
        .unwrap();
    }

    let set = dataset::load_training_set(file.path()).unwrap();
    assert_eq!(set.len(), 20);
    let pipeline =
        training::fit(&set, &TrainingConfig::default().with_n_estimators(10)).unwrap();
    assert!(pipeline.metrics().rmse.is_finite());
}
