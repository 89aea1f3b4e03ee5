//! TF-IDF vectorizer over unigrams and bigrams.
//!
//! Vocabulary selection is pinned so retraining on identical data yields an
//! identical vocabulary: terms are ranked by document frequency (descending),
//! then total term count (descending), then lexicographically; the kept terms
//! get feature ids in lexicographic order.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};
use crate::tokenizer::analyze;
use crate::{SparseVector, TermId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub max_features: usize,
    /// Inclusive n-gram range.
    pub ngram_range: (usize, usize),
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self { max_features: 6000, ngram_range: (1, 2) }
    }
}

impl VectorizerConfig {
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.ngram_range;
        if self.max_features == 0 {
            return Err(PriceError::InvalidConfig("max_features must be at least 1".into()));
        }
        if lo == 0 || hi < lo {
            return Err(PriceError::InvalidConfig(format!("invalid ngram range ({lo}, {hi})")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub config: VectorizerConfig,
    pub dictionary: BTreeMap<String, TermId>,
    /// Smoothed idf per term id.
    pub idf: Vec<f64>,
    pub num_docs: u32,
}

#[derive(Default)]
struct TermStats {
    df: u32,
    tf: u64,
}

impl TfidfVectorizer {
    pub fn fit<S: AsRef<str>>(corpus: &[S], config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        if corpus.is_empty() {
            return Err(PriceError::EmptyTrainingSet);
        }

        let mut stats: HashMap<String, TermStats> = HashMap::new();
        for doc in corpus {
            let terms = analyze(doc.as_ref(), config.ngram_range);
            let mut seen_in_doc: HashSet<&str> = HashSet::new();
            for term in &terms {
                let entry = stats.entry(term.clone()).or_default();
                entry.tf += 1;
                if seen_in_doc.insert(term.as_str()) {
                    entry.df += 1;
                }
            }
        }

        let mut ranked: Vec<(String, TermStats)> = stats.into_iter().collect();
        ranked.sort_by(|(a, sa), (b, sb)| {
            (Reverse(sa.df), Reverse(sa.tf), a).cmp(&(Reverse(sb.df), Reverse(sb.tf), b))
        });
        ranked.truncate(config.max_features);
        ranked.sort_by(|(a, _), (b, _)| a.cmp(b));

        let n = corpus.len() as f64;
        let mut dictionary = BTreeMap::new();
        let mut idf = Vec::with_capacity(ranked.len());
        for (term_id, (term, s)) in ranked.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + s.df as f64)).ln() + 1.0);
            dictionary.insert(term, term_id as TermId);
        }

        if dictionary.is_empty() {
            tracing::warn!(num_docs = corpus.len(), "fit corpus produced an empty vocabulary");
        }
        tracing::info!(num_docs = corpus.len(), vocab_size = dictionary.len(), "vectorizer fitted");

        Ok(Self { config, dictionary, idf, num_docs: corpus.len() as u32 })
    }

    pub fn vocab_size(&self) -> usize { self.dictionary.len() }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    /// Map text into the fitted feature space. Unknown terms are dropped.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in analyze(text, self.config.ngram_range) {
            if let Some(tid) = self.term_id(&term) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }

        let mut vector = SparseVector::new();
        let mut norm = 0.0f64;
        for (tid, tf) in counts {
            let w = tf as f64 * self.idf[tid as usize];
            norm += w * w;
            vector.indices.push(tid);
            vector.values.push(w);
        }
        let norm = norm.sqrt();
        if norm > 0.0 {
            for w in vector.values.iter_mut() { *w /= norm; }
        }
        vector
    }

    pub fn transform_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SparseVector> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }
}
