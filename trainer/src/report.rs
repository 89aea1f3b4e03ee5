use std::fs::{create_dir_all, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use price_core::Result;
use serde::{Deserialize, Serialize};

/// Outcome of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub artifact_path: PathBuf,
    pub train_rows: usize,
    pub holdout_rows: usize,
    pub vocab_size: usize,
    /// Mean absolute error on the holdout split, in price units. `None` when there was no holdout.
    pub holdout_mae: Option<f64>,
    pub created_at: String,
}

pub fn save_report(path: &Path, report: &TrainReport) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut f = File::create(path)?;
    let json = serde_json::to_string_pretty(report).map_err(io::Error::from)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into())
}
