use std::path::Path;

use crate::assemble::ProductInput;
use crate::error::Result;
use crate::persist::{load_pipeline, ArtifactHeader};
use crate::pipeline::{Pipeline, PriceModel};
use crate::price::decode_price;

/// Serves prices from one loaded model. Read-only after construction, so it
/// can be shared behind an `Arc` without locking.
pub struct Predictor<M: PriceModel = Pipeline> {
    model: M,
    header: Option<ArtifactHeader>,
}

impl Predictor<Pipeline> {
    /// Load the artifact at `path`. Fails with `ArtifactNotFound` if it is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (header, pipeline) = load_pipeline(path)?;
        tracing::info!(
            path = %path.display(),
            vocab_size = header.vocab_size,
            created_at = %header.created_at,
            "model loaded"
        );
        Ok(Self { model: pipeline, header: Some(header) })
    }
}

impl<M: PriceModel> Predictor<M> {
    pub fn new(model: M) -> Self {
        Self { model, header: None }
    }

    pub fn header(&self) -> Option<&ArtifactHeader> { self.header.as_ref() }

    pub fn model(&self) -> &M { &self.model }

    pub fn predict(&self, input: &ProductInput) -> f64 {
        self.predict_text(&input.canonical_text())
    }

    /// Empty text short-circuits to 0.0 without touching the model.
    pub fn predict_text(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        decode_price(self.model.predict_log_price(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::ProductFields;
    use crate::error::PriceError;

    struct Fixed(f64);
    impl PriceModel for Fixed {
        fn predict_log_price(&self, _text: &str) -> f64 { self.0 }
    }

    struct Unreachable;
    impl PriceModel for Unreachable {
        fn predict_log_price(&self, text: &str) -> f64 {
            panic!("model invoked for {text:?}")
        }
    }

    #[test]
    fn empty_input_never_reaches_model() {
        let p = Predictor::new(Unreachable);
        assert_eq!(p.predict(&ProductInput::Structured(ProductFields::default())), 0.0);
        assert_eq!(p.predict(&ProductInput::new(ProductFields::default(), Some("  "))), 0.0);
    }

    #[test]
    fn decodes_and_rounds() {
        let p = Predictor::new(Fixed(20.0f64.ln_1p()));
        assert_eq!(p.predict_text("anything"), 20.0);
    }

    #[test]
    fn negative_model_output_is_clamped() {
        let p = Predictor::new(Fixed(-3.0));
        assert_eq!(p.predict(&ProductInput::RawText("x".into())), 0.0);
    }

    #[test]
    fn missing_artifact_fails_with_path() {
        let err = Predictor::load("does/not/exist.bin").err().unwrap();
        assert!(matches!(err, PriceError::ArtifactNotFound { .. }));
        assert!(err.to_string().contains("does/not/exist.bin"));
    }
}
