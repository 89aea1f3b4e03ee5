use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};
use crate::regressor::{RidgeConfig, RidgeRegressor};
use crate::vectorizer::{TfidfVectorizer, VectorizerConfig};

/// Anything that maps canonical text to a log-space price.
pub trait PriceModel: Send + Sync {
    fn predict_log_price(&self, text: &str) -> f64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub vectorizer: VectorizerConfig,
    pub ridge: RidgeConfig,
}

/// Fitted vectorizer followed by a fitted regressor. This is what gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub vectorizer: TfidfVectorizer,
    pub regressor: RidgeRegressor,
}

impl Pipeline {
    pub fn fit<S: AsRef<str>>(corpus: &[S], targets: &[f64], config: &PipelineConfig) -> Result<Self> {
        if corpus.len() != targets.len() {
            return Err(PriceError::InvalidConfig(format!(
                "{} texts but {} targets",
                corpus.len(),
                targets.len()
            )));
        }
        let vectorizer = TfidfVectorizer::fit(corpus, config.vectorizer)?;
        let features = vectorizer.transform_all(corpus);
        let regressor = RidgeRegressor::fit(&features, targets, vectorizer.vocab_size(), config.ridge)?;
        Ok(Self { vectorizer, regressor })
    }

    pub fn predict(&self, text: &str) -> f64 {
        self.regressor.predict(&self.vectorizer.transform(text))
    }

    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<f64> {
        texts.iter().map(|t| self.predict(t.as_ref())).collect()
    }
}

impl PriceModel for Pipeline {
    fn predict_log_price(&self, text: &str) -> f64 { self.predict(text) }
}
