//! Integration test: runtime cache states and idempotence

use laptop_pricer::artifact::ArtifactStore;
use laptop_pricer::dataset::TrainingSet;
use laptop_pricer::preprocessing::choice_manifest;
use laptop_pricer::runtime::{PredictorRuntime, RuntimeConfig};
use laptop_pricer::schema::{FeatureRecord, FeatureValue, FEATURE_COLUMNS};
use laptop_pricer::training::{self, TrainingConfig};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

fn laptop(company: &str, ram: f64) -> FeatureRecord {
    let values = FEATURE_COLUMNS
        .iter()
        .map(|col| match *col {
            "Company" => FeatureValue::categorical(company),
            "RAM" => FeatureValue::numeric(ram),
            c if laptop_pricer::schema::is_numeric(c) => FeatureValue::numeric(2.0),
            _ => FeatureValue::categorical("x"),
        })
        .collect();
    FeatureRecord::new(values).unwrap()
}

fn train_into(dir: &Path) {
    let records: Vec<FeatureRecord> = (0..24)
        .map(|i| laptop(["Apple", "Dell"][i % 2], 4.0 + (i % 6) as f64 * 4.0))
        .collect();
    let targets: Vec<f64> = (0..24)
        .map(|i| 400.0 + (4.0 + (i % 6) as f64 * 4.0) * 80.0)
        .collect();
    let set = TrainingSet { records, targets };

    let pipeline =
        training::fit(&set, &TrainingConfig::default().with_n_estimators(10)).unwrap();
    let choices = choice_manifest(&set.records).unwrap();
    ArtifactStore::new(dir).save(&pipeline, &choices).unwrap();
}

fn write_dataset(path: &Path) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(
        file,
        "Company,TypeName,Inches,CPU_Company,CPU_Frequency,RAM,Memory,Weight,OpSys,Price,Product"
    )
    .unwrap();
    writeln!(
        file,
        "Apple,Ultrabook,13.3,Intel,2.3,8,256GB SSD,1.37,macOS,1339.69,MacBook Pro"
    )
    .unwrap();
    writeln!(
        file,
        "Dell,Notebook,15.6,Intel,2.5,8,256GB SSD,2.2,Windows 10,675.0,XPS 13"
    )
    .unwrap();
}

#[test]
fn test_untrained_state_is_train_first_not_a_crash() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = PredictorRuntime::new(RuntimeConfig {
        dataset_path: dir.path().join("missing.csv"),
        artifacts_dir: dir.path().join("artifacts"),
    });

    assert!(runtime.pipeline().is_none());
    assert!(runtime.choices().is_empty());

    let catalog = runtime.catalog();
    assert!(catalog.error.is_some());
    assert_eq!(catalog.company_count, 0);
}

#[test]
fn test_loaded_slots_are_cached_and_identical() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    let dataset = dir.path().join("laptops.csv");
    train_into(&artifacts);
    write_dataset(&dataset);

    let runtime = PredictorRuntime::new(RuntimeConfig {
        dataset_path: dataset,
        artifacts_dir: artifacts,
    });

    let first = runtime.pipeline().expect("model trained above");
    let second = runtime.pipeline().expect("model trained above");
    // Same Arc, not a re-read
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.metrics(), second.metrics());

    assert!(std::ptr::eq(runtime.choices(), runtime.choices()));
    assert!(std::ptr::eq(runtime.catalog(), runtime.catalog()));
    assert_eq!(runtime.catalog().company_count, 2);
}

#[test]
fn test_slots_initialize_independently() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    train_into(&artifacts);
    // Choices exist, model deleted: each slot reflects its own artifact
    std::fs::remove_file(artifacts.join("model.bin")).unwrap();

    let runtime = PredictorRuntime::new(RuntimeConfig {
        dataset_path: dir.path().join("missing.csv"),
        artifacts_dir: artifacts,
    });

    assert!(runtime.pipeline().is_none());
    assert!(runtime.choices().contains_key("Company"));
}

#[test]
fn test_concurrent_first_access_converges() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    train_into(&artifacts);

    let runtime = Arc::new(PredictorRuntime::new(RuntimeConfig {
        dataset_path: dir.path().join("missing.csv"),
        artifacts_dir: artifacts,
    }));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let runtime = Arc::clone(&runtime);
            std::thread::spawn(move || runtime.pipeline().expect("model trained above"))
        })
        .collect();

    let loaded: Vec<Arc<_>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for pipeline in &loaded[1..] {
        assert!(Arc::ptr_eq(&loaded[0], pipeline), "all callers see one value");
    }
}
