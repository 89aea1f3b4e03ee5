//! Offline training: load, validate, split, fit in log space, evaluate, persist.

pub mod dataset;
pub mod report;
pub mod split;

use std::path::PathBuf;

use price_core::persist::{save_pipeline, ArtifactHeader};
use price_core::price::{decode_price, encode_price};
use price_core::{Pipeline, PipelineConfig, PriceError, Result};

use crate::dataset::{load_dataset, LabeledRow};
use crate::report::{now_rfc3339, TrainReport};
use crate::split::train_test_split;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    pub test_size: f64,
    pub seed: u64,
    pub pipeline: PipelineConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/human_out.csv"),
            output_path: PathBuf::from("models/price_model.bin"),
            test_size: 0.2,
            seed: 42,
            pipeline: PipelineConfig::default(),
        }
    }
}

pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<TrainReport> {
        let cfg = &self.config;
        if !(0.0..1.0).contains(&cfg.test_size) {
            return Err(PriceError::InvalidConfig(format!("test_size must be in [0, 1), got {}", cfg.test_size)));
        }
        cfg.pipeline.vectorizer.validate()?;
        cfg.pipeline.ridge.validate()?;

        let rows = load_dataset(&cfg.data_path)?;
        let (train, holdout) = train_test_split(rows, cfg.test_size, cfg.seed);

        let (texts, targets) = encode(&train);
        let pipeline = Pipeline::fit(&texts, &targets, &cfg.pipeline)?;

        let holdout_mae = mean_absolute_error(&pipeline, &holdout);
        match holdout_mae {
            Some(mae) => tracing::info!(mae, rows = holdout.len(), "holdout evaluated"),
            None => tracing::warn!("no holdout rows; skipping evaluation"),
        }

        let created_at = now_rfc3339();
        save_pipeline(&cfg.output_path, &pipeline, &ArtifactHeader::for_pipeline(&pipeline, created_at.clone()))?;

        let report = TrainReport {
            artifact_path: cfg.output_path.clone(),
            train_rows: train.len(),
            holdout_rows: holdout.len(),
            vocab_size: pipeline.vectorizer.vocab_size(),
            holdout_mae,
            created_at,
        };
        tracing::info!(
            artifact = %report.artifact_path.display(),
            train_rows = report.train_rows,
            holdout_rows = report.holdout_rows,
            vocab_size = report.vocab_size,
            holdout_mae = ?report.holdout_mae,
            "training finished"
        );
        Ok(report)
    }
}

fn encode(rows: &[LabeledRow]) -> (Vec<&str>, Vec<f64>) {
    rows.iter().map(|r| (r.text.as_str(), encode_price(r.price))).unzip()
}

/// MAE in price units, after the same decoding and guardrail used when serving.
pub fn mean_absolute_error(pipeline: &Pipeline, rows: &[LabeledRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let texts: Vec<&str> = rows.iter().map(|r| r.text.as_str()).collect();
    let total: f64 = pipeline
        .predict_batch(&texts)
        .into_iter()
        .zip(rows)
        .map(|(z, r)| (decode_price(z) - r.price).abs())
        .sum();
    Some(total / rows.len() as f64)
}
