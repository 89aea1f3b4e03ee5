//! Two-column labeled dataset: `text,price`, no header row.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use price_core::{PriceError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub text: String,
    pub price: f64,
}

/// Load and validate every row. Any bad row aborts the whole load.
pub fn load_dataset(path: &Path) -> Result<Vec<LabeledRow>> {
    if !path.is_file() {
        return Err(PriceError::DatasetNotFound { path: path.to_path_buf() });
    }
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            PriceError::malformed(path, line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != 2 {
            return Err(PriceError::malformed(
                path,
                line,
                format!("expected 2 columns (text, price), found {}", record.len()),
            ));
        }
        let price = parse_price(&record[1]).map_err(|reason| PriceError::malformed(path, line, reason))?;
        rows.push(LabeledRow { text: record[0].to_string(), price });
    }

    if rows.is_empty() {
        return Err(PriceError::malformed(path, 0, "dataset has no rows"));
    }
    tracing::info!(path = %path.display(), rows = rows.len(), "dataset loaded");
    Ok(rows)
}

fn parse_price(raw: &str) -> std::result::Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("missing price".into());
    }
    let price: f64 = trimmed.parse().map_err(|_| format!("non-numeric price {trimmed:?}"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(format!("price must be a finite non-negative number, got {trimmed:?}"));
    }
    Ok(price)
}
