use std::fs;
use std::path::Path;

use price_core::{PriceError, Predictor};
use tempfile::tempdir;
use trainer::report::{save_report, TrainReport};
use trainer::{TrainConfig, Trainer};

const WIDGETS: &str = "\"Title: Widget\",10.0\n\"Title: Gadget\",20.0\n\"Title: Widget Pro\",15.0\n\"Title: Gadget Max\",25.0\n";

fn config(dir: &Path, data: &str) -> TrainConfig {
    let data_path = dir.join("data.csv");
    fs::write(&data_path, data).unwrap();
    TrainConfig {
        data_path,
        output_path: dir.join("models/price_model.bin"),
        ..Default::default()
    }
}

#[test]
fn trains_tiny_corpus_end_to_end() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), WIDGETS);
    let report = Trainer::new(cfg.clone()).run().unwrap();

    assert_eq!(report.train_rows, 3);
    assert_eq!(report.holdout_rows, 1);
    assert!(report.vocab_size > 0);
    let mae = report.holdout_mae.unwrap();
    assert!(mae.is_finite() && mae >= 0.0);
    assert!(cfg.output_path.exists());

    let predictor = Predictor::load(&cfg.output_path).unwrap();
    let price = predictor.predict_text("Title: Widget");
    assert!(price.is_finite());
    assert!(price >= 0.0);
}

#[test]
fn repeated_runs_are_deterministic() {
    let a_dir = tempdir().unwrap();
    let b_dir = tempdir().unwrap();
    let a_cfg = config(a_dir.path(), WIDGETS);
    let b_cfg = config(b_dir.path(), WIDGETS);
    let a = Trainer::new(a_cfg.clone()).run().unwrap();
    let b = Trainer::new(b_cfg.clone()).run().unwrap();
    assert_eq!(a.holdout_mae, b.holdout_mae);

    let pa = Predictor::load(&a_cfg.output_path).unwrap();
    let pb = Predictor::load(&b_cfg.output_path).unwrap();
    assert_eq!(pa.model(), pb.model());
    assert_eq!(pa.predict_text("Title: Widget"), pb.predict_text("Title: Widget"));
}

#[test]
fn non_numeric_price_aborts_before_writing() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), "\"Title: Widget\",10.0\n\"Title: Gadget\",twenty\n");
    let err = Trainer::new(cfg.clone()).run().unwrap_err();
    assert!(matches!(err, PriceError::DatasetMalformed { line: 2, .. }));
    assert!(!cfg.output_path.exists());
    assert!(!dir.path().join("models").exists());
}

#[test]
fn missing_dataset_is_fatal() {
    let dir = tempdir().unwrap();
    let cfg = TrainConfig {
        data_path: dir.path().join("absent.csv"),
        output_path: dir.path().join("model.bin"),
        ..Default::default()
    };
    let err = Trainer::new(cfg.clone()).run().unwrap_err();
    assert!(matches!(err, PriceError::DatasetNotFound { .. }));
    assert!(err.to_string().contains("absent.csv"));
    assert!(!cfg.output_path.exists());
}

#[test]
fn invalid_test_size_is_rejected() {
    let dir = tempdir().unwrap();
    let mut cfg = config(dir.path(), WIDGETS);
    cfg.test_size = 1.5;
    assert!(matches!(Trainer::new(cfg).run(), Err(PriceError::InvalidConfig(_))));
}

#[test]
fn single_row_trains_without_holdout() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), "\"Title: Lonely Lamp\",42.0\n");
    let report = Trainer::new(cfg.clone()).run().unwrap();
    assert_eq!(report.holdout_rows, 0);
    assert_eq!(report.holdout_mae, None);
    // With one row the model collapses to its intercept.
    let price = Predictor::load(&cfg.output_path).unwrap().predict_text("Title: Lonely Lamp");
    assert_eq!(price, 42.0);
}

#[test]
fn report_is_written_as_json() {
    let dir = tempdir().unwrap();
    let report = Trainer::new(config(dir.path(), WIDGETS)).run().unwrap();
    let path = dir.path().join("reports/train.json");
    save_report(&path, &report).unwrap();
    let parsed: TrainReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn report_floats_survive_json_exactly() {
    let dir = tempdir().unwrap();
    let report = TrainReport {
        artifact_path: dir.path().join("model.bin"),
        train_rows: 3,
        holdout_rows: 1,
        vocab_size: 7,
        holdout_mae: Some(1.9100000000000001),
        created_at: "2024-01-01T00:00:00Z".into(),
    };
    let path = dir.path().join("report.json");
    save_report(&path, &report).unwrap();
    let parsed: TrainReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.holdout_mae, report.holdout_mae);
}
