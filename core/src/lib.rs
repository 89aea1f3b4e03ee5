pub mod assemble;
pub mod error;
pub mod persist;
pub mod pipeline;
pub mod predictor;
pub mod price;
pub mod regressor;
pub mod tokenizer;
pub mod vectorizer;

use serde::{Deserialize, Serialize};

pub use assemble::{assemble, ProductFields, ProductInput};
pub use error::{PriceError, Result};
pub use pipeline::{Pipeline, PipelineConfig, PriceModel};
pub use predictor::Predictor;
pub use regressor::{RidgeConfig, RidgeRegressor};
pub use vectorizer::{TfidfVectorizer, VectorizerConfig};

pub type TermId = u32;

/// Sparse feature vector. `indices` are strictly increasing and parallel to `values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<TermId>,
    pub values: Vec<f64>,
}

impl SparseVector {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.indices.len() }

    pub fn is_empty(&self) -> bool { self.indices.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product against a dense vector. Panics if an index is out of range.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter().map(|(i, v)| v * dense[i as usize]).sum()
    }
}
