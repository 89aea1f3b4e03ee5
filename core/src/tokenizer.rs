use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
}

/// Tokenize text into lowercase words of two or more word characters, using NFKC normalization.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

/// Contiguous n-grams of `tokens` for every n in `min_n..=max_n`, joined by a single space.
pub fn ngrams(tokens: &[String], min_n: usize, max_n: usize) -> Vec<String> {
    let min_n = min_n.max(1);
    let mut out = Vec::new();
    for n in min_n..=max_n {
        if n == 1 {
            out.extend(tokens.iter().cloned());
            continue;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}

/// Tokenize and expand into the n-gram terms the vectorizer counts.
pub fn analyze(text: &str, ngram_range: (usize, usize)) -> Vec<String> {
    ngrams(&tokenize(text), ngram_range.0, ngram_range.1)
}
