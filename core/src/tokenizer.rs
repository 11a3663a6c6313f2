use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Text normalization applied to whole buffers before tokenization.
pub trait Normalizer: Send + Sync {
    /// Unicode canonicalization only (NFKC).
    fn canonicalize(&self, buffer: &str) -> String {
        buffer.nfkc().collect()
    }

    fn normalize(&self, buffer: &str) -> String;
}

/// NFKC plus lowercasing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleNormalizer;

impl Normalizer for SimpleNormalizer {
    fn normalize(&self, buffer: &str) -> String {
        self.canonicalize(buffer).to_lowercase()
    }
}

/// [`SimpleNormalizer`] followed by English stemming of every word.
#[derive(Debug, Default, Clone, Copy)]
pub struct PorterNormalizer;

impl Normalizer for PorterNormalizer {
    fn normalize(&self, buffer: &str) -> String {
        let lowered = SimpleNormalizer.normalize(buffer);
        WORD.replace_all(&lowered, |caps: &Captures| STEMMER.stem(&caps[0]).into_owned())
            .into_owned()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerKind {
    #[default]
    Simple,
    Porter,
}

impl NormalizerKind {
    pub fn build(self) -> Box<dyn Normalizer> {
        match self {
            NormalizerKind::Simple => Box::new(SimpleNormalizer),
            NormalizerKind::Porter => Box::new(PorterNormalizer),
        }
    }
}

/// Splits a buffer into tokens, identified by byte ranges.
pub trait Tokenizer: Send + Sync {
    fn ranges(&self, buffer: &str) -> Vec<(usize, usize)>;

    fn strings<'a>(&self, buffer: &'a str) -> Vec<&'a str> {
        self.ranges(buffer).into_iter().map(|(b, e)| &buffer[b..e]).collect()
    }

    fn tokens<'a>(&self, buffer: &'a str) -> Vec<(&'a str, (usize, usize))> {
        self.ranges(buffer).into_iter().map(|(b, e)| (&buffer[b..e], (b, e))).collect()
    }
}

/// Maximal runs of Unicode word characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn ranges(&self, buffer: &str) -> Vec<(usize, usize)> {
        WORD.find_iter(buffer).map(|m| (m.start(), m.end())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_tokenize() {
        let t = SimpleTokenizer.tokens("Hello, wörld!  42");
        assert_eq!(t, vec![("Hello", (0, 5)), ("wörld", (7, 13)), ("42", (16, 18))]);
    }

    #[test]
    fn porter_stems_words() {
        assert_eq!(PorterNormalizer.normalize("Running runners"), "run runner");
    }
}
